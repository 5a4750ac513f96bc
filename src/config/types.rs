use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub looper: Option<LooperConfig>,
    pub control: Option<ControlConfig>,
    pub storage: Option<StorageConfig>,
    pub serve: Option<ServeConfig>,
}

/// Timing overrides for the page-context Looper.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LooperConfig {
    pub search_interval: Option<DurationValue>,
    pub search_attempts: Option<u32>,
    pub settle_delay: Option<DurationValue>,
    pub restart_margin: Option<DurationValue>,
    pub ended_restart_delay: Option<DurationValue>,
    pub resume_delay: Option<DurationValue>,
    pub resume_attempts: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    pub connect: Option<String>,
    pub poll_interval: Option<DurationValue>,
    pub reply_timeout: Option<DurationValue>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub db: Option<String>,
    pub memory: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    pub listen: Option<String>,
    pub autoplay: Option<bool>,
    /// Playlist entries as `<id>:<seconds>`.
    pub videos: Option<Vec<String>>,
    pub tick: Option<DurationValue>,
    pub autonav_delay: Option<DurationValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ConfigError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
