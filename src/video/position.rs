use std::time::Duration;

/// Snapshot of a video clock, converted from the host's floating-point
/// seconds. An unknown duration (NaN, infinite, not yet loaded) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackPosition {
    pub current: Duration,
    pub duration: Option<Duration>,
}

impl PlaybackPosition {
    #[must_use]
    pub fn from_host(current_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            current: seconds_to_duration(current_seconds).unwrap_or_default(),
            duration: seconds_to_duration(duration_seconds),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.duration
            .map(|duration| duration.saturating_sub(self.current))
    }

    /// True once playback has started and no more than `margin` is left.
    #[must_use]
    pub fn is_near_end(&self, margin: Duration) -> bool {
        !self.current.is_zero()
            && self
                .remaining()
                .is_some_and(|remaining| remaining <= margin)
    }

    /// Current position rounded down to whole seconds.
    #[must_use]
    pub const fn whole_seconds(&self) -> u64 {
        self.current.as_secs()
    }
}

/// Converts host seconds into a `Duration`; negative, NaN and infinite
/// values yield `None`.
#[must_use]
pub fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds).ok()
}
