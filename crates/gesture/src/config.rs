use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    pub hold_threshold: Duration,
    pub turbo_delay: Duration,
    pub turbo_interval: Duration,
}

impl GestureConfig {
    pub fn from_millis(hold_threshold: u64, turbo_delay: u64, turbo_interval: u64) -> Self {
        Self {
            hold_threshold: Duration::from_millis(hold_threshold),
            turbo_delay: Duration::from_millis(turbo_delay),
            turbo_interval: Duration::from_millis(turbo_interval),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from_millis(600, 300, 100)
    }
}
