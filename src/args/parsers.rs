use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};
use crate::host::sim::SimVideoSpec;
use crate::video::VideoId;

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_duration_value(s).map_err(|err| ValidationError::InvalidDuration {
        value: s.to_owned(),
        reason: err.to_string(),
    })
}

/// Parses a playlist entry `<id>:<seconds>`.
pub(crate) fn parse_video_entry(s: &str) -> Result<SimVideoSpec, ValidationError> {
    let invalid = || ValidationError::InvalidVideoEntry {
        value: s.to_owned(),
    };
    let (id, seconds) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
    let id = VideoId::new(id.trim()).ok_or_else(invalid)?;
    let seconds: u64 = seconds.trim().parse().map_err(|_err| invalid())?;
    if seconds == 0 {
        return Err(ValidationError::VideoDurationZero {
            value: s.to_owned(),
        });
    }
    Ok(SimVideoSpec {
        id,
        duration: Duration::from_secs(seconds),
    })
}
