use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticPattern {
    Micro,
    Medium,
    Heavy,
    Double,
}

impl HapticPattern {
    pub fn vibration_ms(self) -> &'static [u64] {
        match self {
            Self::Micro => &[5],
            Self::Medium => &[30],
            Self::Heavy => &[50],
            Self::Double => &[50, 30, 50],
        }
    }
}

pub trait Feedback: Send + Sync {
    fn feedback(&self, pattern: HapticPattern);
}

pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn feedback(&self, _pattern: HapticPattern) {}
}

#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    patterns: Arc<Mutex<Vec<HapticPattern>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<HapticPattern> {
        self.patterns
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl Feedback for RecordingFeedback {
    fn feedback(&self, pattern: HapticPattern) {
        if let Ok(mut guard) = self.patterns.lock() {
            guard.push(pattern);
        }
    }
}
