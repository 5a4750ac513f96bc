use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

/// Persisted loop settings for one video.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopRecord {
    pub loop_start_seconds: f64,
    pub is_active: bool,
}

impl LoopRecord {
    #[must_use]
    pub const fn new(loop_start_seconds: f64, is_active: bool) -> Self {
        Self {
            loop_start_seconds,
            is_active,
        }
    }

    /// Reason the record cannot be applied, if any.
    #[must_use]
    pub const fn invalid_reason(&self) -> Option<&'static str> {
        if !self.loop_start_seconds.is_finite() {
            return Some("loop start is not finite");
        }
        if self.loop_start_seconds < 0.0 {
            return Some("loop start is negative");
        }
        None
    }
}

/// A record together with its key and last write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub video_id: VideoId,
    #[serde(flatten)]
    pub record: LoopRecord,
    pub updated_at_ms: u64,
}

#[must_use]
pub fn current_time_ms() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(now.as_millis()).unwrap_or(u64::MAX)
}
