//! Bounded, timer-driven retry bookkeeping.
//!
//! Attempts are numbered from 1. The caller schedules the next attempt after
//! `delay` and asks the policy whether another one is allowed.
use std::num::NonZeroU32;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: NonZeroU32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Number of the attempt to schedule after `failed_attempt`, or `None`
    /// once the budget is spent.
    #[must_use]
    pub fn next_attempt(&self, failed_attempt: u32) -> Option<u32> {
        let next = failed_attempt.checked_add(1)?;
        (next <= self.max_attempts.get()).then_some(next)
    }
}
