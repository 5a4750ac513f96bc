use std::num::NonZeroU32;
use std::time::Duration;

use crate::retry::RetryPolicy;

const SEARCH_INTERVAL: Duration = Duration::from_secs(1);
const SEARCH_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(600) {
    Some(value) => value,
    None => NonZeroU32::MIN,
};
const SETTLE_DELAY: Duration = Duration::from_secs(1);
const RESTART_MARGIN: Duration = Duration::from_millis(500);
const ENDED_RESTART_DELAY: Duration = Duration::from_millis(100);
const RESUME_DELAY: Duration = Duration::from_millis(100);
const RESUME_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(2) {
    Some(value) => value,
    None => NonZeroU32::MIN,
};

/// Delays and budgets driving the Looper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LooperTiming {
    /// Video element discovery.
    pub search: RetryPolicy,
    /// Wait after a navigation before searching again.
    pub settle_delay: Duration,
    /// Remaining time at or below which playback restarts early.
    pub restart_margin: Duration,
    pub ended_restart_delay: Duration,
    /// Playback resume after a restart seek.
    pub resume: RetryPolicy,
}

impl Default for LooperTiming {
    fn default() -> Self {
        Self {
            search: RetryPolicy::new(SEARCH_ATTEMPTS, SEARCH_INTERVAL),
            settle_delay: SETTLE_DELAY,
            restart_margin: RESTART_MARGIN,
            ended_restart_delay: ENDED_RESTART_DELAY,
            resume: RetryPolicy::new(RESUME_ATTEMPTS, RESUME_DELAY),
        }
    }
}
