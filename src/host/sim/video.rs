use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, HostError};
use crate::host::VideoElement;
use crate::video::seconds_to_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Playing,
    Paused,
    /// Playback reached the end during this tick.
    Ended,
}

#[derive(Debug)]
struct SimVideoState {
    current: Duration,
    duration: Option<Duration>,
    paused: bool,
    ended: bool,
    seeks: Vec<Duration>,
    play_calls: u32,
    rejected_plays: u32,
}

/// A video clock advanced by [`SimVideo::advance`]. `duration` of `None`
/// reports NaN, like an element whose media has not loaded.
#[derive(Debug)]
pub struct SimVideo {
    state: Mutex<SimVideoState>,
}

impl SimVideo {
    #[must_use]
    pub const fn new(duration: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(SimVideoState {
                current: Duration::ZERO,
                duration,
                paused: false,
                ended: false,
                seeks: Vec::new(),
                play_calls: 0,
                rejected_plays: 0,
            }),
        }
    }

    /// Moves the clock forward by `tick` when playing.
    #[must_use]
    pub fn advance(&self, tick: Duration) -> TickOutcome {
        self.with_state(|state| {
            if state.paused || state.ended {
                return TickOutcome::Paused;
            }
            let next = state.current.saturating_add(tick);
            match state.duration {
                Some(duration) if next >= duration => {
                    state.current = duration;
                    state.paused = true;
                    state.ended = true;
                    TickOutcome::Ended
                }
                _ => {
                    state.current = next;
                    TickOutcome::Playing
                }
            }
        })
    }

    pub fn set_current(&self, current: Duration) {
        self.with_state(|state| state.current = current);
    }

    pub fn pause(&self) {
        self.with_state(|state| state.paused = true);
    }

    /// Makes the next `count` calls to `play` fail.
    pub fn reject_next_plays(&self, count: u32) {
        self.with_state(|state| state.rejected_plays = count);
    }

    #[must_use]
    pub fn seeks(&self) -> Vec<Duration> {
        self.with_state(|state| state.seeks.clone())
    }

    #[must_use]
    pub fn play_calls(&self) -> u32 {
        self.with_state(|state| state.play_calls)
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.with_state(|state| state.ended)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.with_state(|state| state.paused)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SimVideoState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl VideoElement for SimVideo {
    fn current_time(&self) -> f64 {
        self.with_state(|state| state.current.as_secs_f64())
    }

    fn duration(&self) -> f64 {
        self.with_state(|state| state.duration.map_or(f64::NAN, |d| d.as_secs_f64()))
    }

    fn seek(&self, seconds: f64) -> AppResult<()> {
        let target = seconds_to_duration(seconds).ok_or_else(|| {
            AppError::host(HostError::SeekFailed {
                reason: format!("{} is not a playable position", seconds),
            })
        })?;
        self.with_state(|state| {
            let target = state.duration.map_or(target, |duration| target.min(duration));
            state.current = target;
            state.ended = false;
            state.seeks.push(target);
        });
        Ok(())
    }

    async fn play(&self) -> AppResult<()> {
        self.with_state(|state| {
            state.play_calls = state.play_calls.saturating_add(1);
            if state.rejected_plays > 0 {
                state.rejected_plays = state.rejected_plays.saturating_sub(1);
                return Err(AppError::host(HostError::ResumeRejected {
                    reason: "playback request was interrupted".to_owned(),
                }));
            }
            state.paused = false;
            state.ended = false;
            Ok(())
        })
    }
}
