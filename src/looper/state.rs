use crate::storage::LoopRecord;
use crate::video::VideoId;

/// Restart point and active flag for the video on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoopState {
    /// Identifier the state was recorded for; used to detect a stale page.
    pub video_id: Option<VideoId>,
    pub loop_start_seconds: f64,
    pub is_active: bool,
}

impl LoopState {
    #[must_use]
    pub fn for_video(video_id: Option<VideoId>) -> Self {
        Self {
            video_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn record(&self) -> LoopRecord {
        LoopRecord::new(self.loop_start_seconds, self.is_active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperPhase {
    /// Waiting for the page to finish loading.
    Uninitialized,
    /// Polling for the video element.
    Searching,
    Attached,
    /// Navigation seen; waiting before searching again.
    Settling,
    /// Search budget exhausted; waiting for the next navigation.
    Idle,
}
