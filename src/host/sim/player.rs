use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{SimPage, SimVideo, TickOutcome};
use crate::looper::{LooperEvent, LooperHandle};
use crate::shutdown::ShutdownSender;
use crate::video::VideoId;

/// One entry of the simulated playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimVideoSpec {
    pub id: VideoId,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPlayerConfig {
    /// Clock resolution; also the spacing of time updates.
    pub tick: Duration,
    /// How long an ended video sits before the site moves to the next one.
    pub autonav_delay: Duration,
    /// Gap between an address change and the new video element appearing.
    pub element_delay: Duration,
}

impl Default for SimPlayerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            autonav_delay: Duration::from_secs(3),
            element_delay: Duration::from_millis(300),
        }
    }
}

struct PendingElement {
    since: Instant,
    duration: Duration,
}

struct SimPlayer {
    page: Arc<SimPage>,
    playlist: Vec<SimVideoSpec>,
    config: SimPlayerConfig,
    looper: LooperHandle,
    index: usize,
    ended_at: Option<Instant>,
    pending: Option<PendingElement>,
}

/// Drives `page` like a browser tab would: loads the first playlist entry,
/// advances its clock every tick and follows the site's autoplay to the next
/// entry when a video ends and nothing restarted it in time.
#[must_use]
pub fn spawn_sim_player(
    page: Arc<SimPage>,
    playlist: Vec<SimVideoSpec>,
    config: SimPlayerConfig,
    looper: LooperHandle,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut player = SimPlayer {
        page,
        playlist,
        config,
        looper,
        index: 0,
        ended_at: None,
        pending: None,
    };
    // Load synchronously so the page-ready event is queued ahead of any
    // command sent once this returns.
    let started = player.start();
    tokio::spawn(async move {
        if !started {
            return;
        }
        let mut ticker = tokio::time::interval(player.config.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    if !player.tick() {
                        break;
                    }
                }
            }
        }
        debug!("Simulated player stopped.");
    })
}

impl SimPlayer {
    fn start(&mut self) -> bool {
        if let Some(first) = self.playlist.first() {
            info!("Loading {} ({}s)", first.id, first.duration.as_secs());
            self.page.navigate(&first.id.watch_url());
            self.page
                .set_video(Some(Arc::new(SimVideo::new(Some(first.duration)))));
        }
        self.dispatch(LooperEvent::PageReady)
    }

    /// Returns false once the Looper is gone.
    fn tick(&mut self) -> bool {
        if let Some(pending) = &self.pending {
            if pending.since.elapsed() < self.config.element_delay {
                return true;
            }
            let duration = pending.duration;
            self.pending = None;
            self.page
                .set_video(Some(Arc::new(SimVideo::new(Some(duration)))));
            return self.dispatch(LooperEvent::DomMutated);
        }

        let Some(video) = self.page.sim_video() else {
            return true;
        };
        match video.advance(self.config.tick) {
            TickOutcome::Playing => {
                self.ended_at = None;
                self.dispatch(LooperEvent::TimeUpdate)
            }
            TickOutcome::Ended => {
                self.ended_at = Some(Instant::now());
                self.dispatch(LooperEvent::Ended)
            }
            TickOutcome::Paused => {
                if !video.is_ended() {
                    self.ended_at = None;
                    return true;
                }
                let due = self
                    .ended_at
                    .is_some_and(|ended_at| ended_at.elapsed() >= self.config.autonav_delay);
                if due && self.page.autonav_enabled() {
                    return self.play_next();
                }
                true
            }
        }
    }

    fn play_next(&mut self) -> bool {
        self.ended_at = None;
        let Some(next_index) = self.index.checked_add(1) else {
            return true;
        };
        let Some(next) = self.playlist.get(next_index) else {
            debug!("Playlist finished; nothing to autoplay.");
            return true;
        };
        info!("Autoplay moving to {}", next.id);
        self.index = next_index;
        self.pending = Some(PendingElement {
            since: Instant::now(),
            duration: next.duration,
        });
        let location = next.id.watch_url();
        self.page.set_video(None);
        self.page.navigate(&location);
        self.dispatch(LooperEvent::DomMutated)
    }

    fn dispatch(&self, event: LooperEvent) -> bool {
        match self.looper.dispatch(event) {
            Ok(()) => true,
            Err(err) => {
                debug!("Simulated player lost the looper: {}", err);
                false
            }
        }
    }
}
