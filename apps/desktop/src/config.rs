use std::{fs, path::Path};

use gesture::GestureConfig;
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "crumbs.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub hold_threshold_ms: u64,
    pub turbo_delay_ms: u64,
    pub turbo_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".into(),
            hold_threshold_ms: 600,
            turbo_delay_ms: 300,
            turbo_interval_ms: 100,
        }
    }
}

impl Settings {
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig::from_millis(
            self.hold_threshold_ms,
            self.turbo_delay_ms,
            self.turbo_interval_ms,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    hold_threshold_ms: Option<u64>,
    turbo_delay_ms: Option<u64>,
    turbo_interval_ms: Option<u64>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.hold_threshold_ms {
                    settings.hold_threshold_ms = v;
                }
                if let Some(v) = file_cfg.turbo_delay_ms {
                    settings.turbo_delay_ms = v;
                }
                if let Some(v) = file_cfg.turbo_interval_ms {
                    settings.turbo_interval_ms = v;
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "config: ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("CRUMBS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    let millis = |key: &str| env(key).and_then(|v| v.parse::<u64>().ok());
    if let Some(v) = millis("APP__HOLD_THRESHOLD_MS") {
        settings.hold_threshold_ms = v;
    }
    if let Some(v) = millis("APP__TURBO_DELAY_MS") {
        settings.turbo_delay_ms = v;
    }
    if let Some(v) = millis("APP__TURBO_INTERVAL_MS") {
        settings.turbo_interval_ms = v;
    }

    settings
}
