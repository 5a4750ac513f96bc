use async_trait::async_trait;

use crate::error::AppResult;
use crate::video::PlaybackPosition;

/// A media element as the host exposes it: clock readings in seconds, a seek
/// and an asynchronous resume that may be rejected.
#[async_trait]
pub trait VideoElement: Send + Sync {
    fn current_time(&self) -> f64;

    /// NaN until the media is loaded, infinite for live streams.
    fn duration(&self) -> f64;

    /// # Errors
    ///
    /// Returns an error when the element refuses the seek.
    fn seek(&self, seconds: f64) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the host rejects playback.
    async fn play(&self) -> AppResult<()>;

    fn position(&self) -> PlaybackPosition {
        PlaybackPosition::from_host(self.current_time(), self.duration())
    }
}
