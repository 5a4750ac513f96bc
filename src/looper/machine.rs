use std::sync::Arc;
use std::time::Duration;

use super::autoplay::suppress_autoplay;
use super::event::{LooperEffect, LooperEvent, LooperTimer};
use super::state::{LoopState, LooperPhase};
use super::timing::LooperTiming;
use super::LOOP_DISABLED_NOTICE;
use crate::host::{HostPage, VideoElement};
use crate::protocol::{Command, Request, Response, StatusReport};
use crate::storage::LoopRecord;
use crate::video::VideoId;

/// Loop state machine for one page.
pub struct Looper {
    page: Arc<dyn HostPage>,
    timing: LooperTiming,
    phase: LooperPhase,
    state: LoopState,
    video: Option<Arc<dyn VideoElement>>,
    listeners_attached: bool,
    last_location: Option<String>,
    /// Bumped on every search start so timers from older searches are ignored.
    generation: u64,
    search_attempt: u32,
    pending_load: Option<VideoId>,
}

impl Looper {
    #[must_use]
    pub fn new(page: Arc<dyn HostPage>, timing: LooperTiming) -> Self {
        Self {
            page,
            timing,
            phase: LooperPhase::Uninitialized,
            state: LoopState::default(),
            video: None,
            listeners_attached: false,
            last_location: None,
            generation: 0,
            search_attempt: 0,
            pending_load: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> LooperPhase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &LoopState {
        &self.state
    }

    #[must_use]
    pub const fn timing(&self) -> &LooperTiming {
        &self.timing
    }

    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    #[must_use]
    pub fn video(&self) -> Option<Arc<dyn VideoElement>> {
        self.video.clone()
    }

    pub fn handle_event(&mut self, event: LooperEvent) -> Vec<LooperEffect> {
        let mut effects = Vec::new();
        match event {
            LooperEvent::PageReady => self.on_page_ready(&mut effects),
            LooperEvent::DomMutated => self.on_dom_mutated(&mut effects),
            LooperEvent::TimeUpdate => self.on_time_update(&mut effects),
            LooperEvent::Ended => {
                if self.listeners_attached && self.state.is_active {
                    effects.push(LooperEffect::Schedule {
                        delay: self.timing.ended_restart_delay,
                        timer: LooperTimer::EndedRestart,
                    });
                }
            }
            LooperEvent::Timer(timer) => self.on_timer(timer, &mut effects),
            LooperEvent::RecordLoaded { video_id, record } => {
                self.on_record_loaded(&video_id, record);
            }
            LooperEvent::ResumeFailed { attempt, reason } => {
                if let Some(next) = self.timing.resume.next_attempt(attempt) {
                    tracing::warn!(
                        "Playback resume attempt {} failed ({}); retrying in {}ms.",
                        attempt,
                        reason,
                        self.timing.resume.delay().as_millis()
                    );
                    effects.push(LooperEffect::Schedule {
                        delay: self.timing.resume.delay(),
                        timer: LooperTimer::ResumeRetry { attempt: next },
                    });
                } else {
                    tracing::error!(
                        "Playback resume failed after {} attempts: {}",
                        attempt,
                        reason
                    );
                }
            }
        }
        effects
    }

    /// Applies a command and produces its response. State is mutated before
    /// the response is built; persistence happens through the returned
    /// effects.
    pub fn handle_request(&mut self, request: &Request) -> (Response, Vec<LooperEffect>) {
        let mut effects = Vec::new();
        let command = match Command::parse(request) {
            Ok(command) => command,
            Err(rejection) => {
                tracing::debug!("Rejected request {:?}: {:?}", request, rejection);
                return (rejection.into_response(), effects);
            }
        };
        let response = match command {
            Command::SetLoopTime { time } => {
                self.set_loop_time(time, &mut effects);
                Response::ok()
            }
            Command::SetCurrentTime => {
                let seconds = self.current_whole_seconds();
                self.set_loop_time(Duration::from_secs(seconds).as_secs_f64(), &mut effects);
                Response::ok()
            }
            Command::DisableLoop => {
                self.disable_loop(&mut effects);
                Response::ok()
            }
            Command::GetStatus => Response::Status(self.status()),
        };
        (response, effects)
    }

    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport {
            is_active: self.state.is_active,
            loop_time: self.state.loop_start_seconds,
            current_time: self.current_whole_seconds(),
            video_id: self.current_video_id().map(VideoId::into_string),
        }
    }

    fn on_page_ready(&mut self, effects: &mut Vec<LooperEffect>) {
        match self.phase {
            LooperPhase::Uninitialized => {
                self.last_location = Some(self.page.location());
                self.begin_search(effects);
            }
            LooperPhase::Attached => self.try_attach(effects),
            LooperPhase::Searching | LooperPhase::Settling | LooperPhase::Idle => {
                tracing::debug!("Page ready ignored in phase {:?}.", self.phase);
            }
        }
    }

    fn on_dom_mutated(&mut self, effects: &mut Vec<LooperEffect>) {
        if self.phase == LooperPhase::Uninitialized {
            return;
        }
        let location = self.page.location();
        if self.last_location.as_deref() == Some(location.as_str()) {
            return;
        }
        tracing::info!("Navigation detected: {}", location);
        self.last_location = Some(location);
        self.listeners_attached = false;
        self.video = None;
        self.state.video_id = None;
        self.pending_load = None;
        self.generation = self.generation.wrapping_add(1);
        self.phase = LooperPhase::Settling;
        effects.push(LooperEffect::Schedule {
            delay: self.timing.settle_delay,
            timer: LooperTimer::Settle {
                generation: self.generation,
            },
        });
    }

    fn on_time_update(&mut self, effects: &mut Vec<LooperEffect>) {
        if !self.listeners_attached || !self.state.is_active {
            return;
        }
        let Some(video) = self.video.as_ref() else {
            return;
        };
        if video.position().is_near_end(self.timing.restart_margin) {
            self.restart_at_loop_time(effects);
        }
    }

    fn on_timer(&mut self, timer: LooperTimer, effects: &mut Vec<LooperEffect>) {
        match timer {
            LooperTimer::SearchRetry { generation } => {
                if generation == self.generation && self.phase == LooperPhase::Searching {
                    self.try_attach(effects);
                }
            }
            LooperTimer::Settle { generation } => {
                if generation == self.generation && self.phase == LooperPhase::Settling {
                    self.begin_search(effects);
                }
            }
            LooperTimer::EndedRestart => {
                if self.state.is_active {
                    self.restart_at_loop_time(effects);
                }
            }
            // Fires even if the loop was disabled after the failed attempt.
            LooperTimer::ResumeRetry { attempt } => {
                if self.video.is_some() {
                    effects.push(LooperEffect::Resume { attempt });
                }
            }
        }
    }

    fn on_record_loaded(&mut self, video_id: &VideoId, record: Option<LoopRecord>) {
        if self.pending_load.as_ref() != Some(video_id)
            || self.current_video_id().as_ref() != Some(video_id)
        {
            tracing::debug!("Discarding stale loop record for {}.", video_id);
            return;
        }
        self.pending_load = None;
        let Some(record) = record else {
            return;
        };
        if let Some(reason) = record.invalid_reason() {
            tracing::warn!("Ignoring stored loop for {}: {}", video_id, reason);
            return;
        }
        tracing::info!(
            "Restored loop for {}: start {}s, active {}.",
            video_id,
            record.loop_start_seconds,
            record.is_active
        );
        self.state.loop_start_seconds = record.loop_start_seconds;
        self.state.is_active = record.is_active;
    }

    fn begin_search(&mut self, effects: &mut Vec<LooperEffect>) {
        self.generation = self.generation.wrapping_add(1);
        self.search_attempt = 0;
        self.phase = LooperPhase::Searching;
        self.try_attach(effects);
    }

    fn try_attach(&mut self, effects: &mut Vec<LooperEffect>) {
        if let Some(video) = self.page.find_video() {
            self.attach(video, effects);
            return;
        }
        self.search_attempt = self.search_attempt.saturating_add(1);
        if self.timing.search.next_attempt(self.search_attempt).is_some() {
            effects.push(LooperEffect::Schedule {
                delay: self.timing.search.delay(),
                timer: LooperTimer::SearchRetry {
                    generation: self.generation,
                },
            });
        } else {
            tracing::warn!(
                "No video element found after {} attempts; waiting for navigation.",
                self.search_attempt
            );
            self.phase = LooperPhase::Idle;
        }
    }

    fn attach(&mut self, video: Arc<dyn VideoElement>, effects: &mut Vec<LooperEffect>) {
        self.video = Some(video);
        self.phase = LooperPhase::Attached;
        if self.listeners_attached {
            tracing::debug!("Playback listeners already attached.");
            return;
        }
        self.listeners_attached = true;

        let current = self.current_video_id();
        if self.state.video_id != current {
            self.state = LoopState::for_video(current.clone());
        }
        match current {
            Some(video_id) => {
                tracing::debug!("Attached to video {}.", video_id);
                self.pending_load = Some(video_id.clone());
                effects.push(LooperEffect::Load { video_id });
            }
            None => tracing::debug!("Attached to a video outside a watch page."),
        }
    }

    fn restart_at_loop_time(&mut self, effects: &mut Vec<LooperEffect>) {
        let Some(video) = self.video.clone() else {
            return;
        };
        if !self.state.is_active {
            return;
        }
        let current = self.current_video_id();
        if let Some(recorded) = self.state.video_id.as_ref()
            && current.as_ref() != Some(recorded)
        {
            tracing::debug!(
                "Skipping restart: loop belongs to {} but page shows {:?}.",
                recorded,
                current
            );
            return;
        }

        if let Some(rewritten) = suppress_autoplay(self.page.as_ref()) {
            self.last_location = Some(rewritten);
        }

        if let Err(err) = video.seek(self.state.loop_start_seconds) {
            tracing::warn!("Restart seek failed: {}", err);
            return;
        }
        tracing::debug!("Restarted at {}s.", self.state.loop_start_seconds);
        effects.push(LooperEffect::Resume { attempt: 1 });
    }

    fn set_loop_time(&mut self, seconds: f64, effects: &mut Vec<LooperEffect>) {
        self.state.loop_start_seconds = seconds;
        self.state.is_active = true;
        self.state.video_id = self.current_video_id();
        // A user choice wins over a record still being loaded.
        self.pending_load = None;
        tracing::info!("Loop set at {}s.", seconds);
        self.persist(effects);
    }

    fn disable_loop(&mut self, effects: &mut Vec<LooperEffect>) {
        self.state.is_active = false;
        self.state.video_id = None;
        self.pending_load = None;
        tracing::info!("Loop disabled.");
        self.persist(effects);
        effects.push(LooperEffect::Notify {
            message: LOOP_DISABLED_NOTICE,
        });
    }

    fn persist(&self, effects: &mut Vec<LooperEffect>) {
        match self.current_video_id() {
            Some(video_id) => effects.push(LooperEffect::Persist {
                video_id,
                record: self.state.record(),
            }),
            None => tracing::debug!("Not on a watch page; loop state kept in memory only."),
        }
    }

    fn current_video_id(&self) -> Option<VideoId> {
        VideoId::from_page_url(&self.page.location())
    }

    fn current_whole_seconds(&self) -> u64 {
        self.video
            .as_ref()
            .map_or(0, |video| video.position().whole_seconds())
    }
}
