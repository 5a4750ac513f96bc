use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use super::SimVideo;
use crate::error::{AppError, AppResult, HostError};
use crate::host::{HostPage, ToggleState, VideoElement};
use crate::protocol::TabInfo;

const TAB_EVENT_CAPACITY: usize = 16;

#[derive(Debug)]
struct SimPageState {
    location: String,
    video: Option<Arc<SimVideo>>,
    autoplay_toggle: Option<ToggleState>,
    player_autoplay: Option<bool>,
    toggle_presses: u32,
    notifications: Vec<String>,
}

/// In-process page: an address, at most one video, the site's autoplay
/// controls and a feed of tab updates for the bridge.
#[derive(Debug)]
pub struct SimPage {
    state: Mutex<SimPageState>,
    tab_tx: broadcast::Sender<TabInfo>,
}

impl SimPage {
    #[must_use]
    pub fn new(location: &str) -> Self {
        let (tab_tx, _) = broadcast::channel(TAB_EVENT_CAPACITY);
        Self {
            state: Mutex::new(SimPageState {
                location: location.to_owned(),
                video: None,
                autoplay_toggle: None,
                player_autoplay: None,
                toggle_presses: 0,
                notifications: Vec::new(),
            }),
            tab_tx,
        }
    }

    /// Enables the site's autoplay controls: a toggle in `toggle` state and a
    /// player configuration flag set to `player_autoplay`.
    #[must_use]
    pub fn with_autoplay(self, toggle: ToggleState, player_autoplay: bool) -> Self {
        self.with_state(|state| {
            state.autoplay_toggle = Some(toggle);
            state.player_autoplay = Some(player_autoplay);
        });
        self
    }

    /// Moves to a new address and announces it as a tab update.
    pub fn navigate(&self, location: &str) {
        self.with_state(|state| state.location = location.to_owned());
        self.announce(location);
    }

    pub fn set_video(&self, video: Option<Arc<SimVideo>>) {
        self.with_state(|state| state.video = video);
    }

    #[must_use]
    pub fn sim_video(&self) -> Option<Arc<SimVideo>> {
        self.with_state(|state| state.video.clone())
    }

    #[must_use]
    pub fn tab_info(&self) -> TabInfo {
        TabInfo::new(Some(self.location()))
    }

    #[must_use]
    pub fn subscribe_tabs(&self) -> broadcast::Receiver<TabInfo> {
        self.tab_tx.subscribe()
    }

    #[must_use]
    pub fn tab_sender(&self) -> broadcast::Sender<TabInfo> {
        self.tab_tx.clone()
    }

    /// True when the site would move on to the next video at the end.
    #[must_use]
    pub fn autonav_enabled(&self) -> bool {
        self.with_state(|state| {
            state.autoplay_toggle == Some(ToggleState::On) && state.player_autoplay != Some(false)
        })
    }

    #[must_use]
    pub fn player_autoplay(&self) -> Option<bool> {
        self.with_state(|state| state.player_autoplay)
    }

    #[must_use]
    pub fn toggle_presses(&self) -> u32 {
        self.with_state(|state| state.toggle_presses)
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.with_state(|state| state.notifications.clone())
    }

    fn announce(&self, location: &str) {
        // No subscribers is fine: nobody is watching the tab.
        if self.tab_tx.send(TabInfo::new(Some(location.to_owned()))).is_err() {
            tracing::trace!("No tab listeners for {}", location);
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SimPageState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl HostPage for SimPage {
    fn location(&self) -> String {
        self.with_state(|state| state.location.clone())
    }

    fn find_video(&self) -> Option<Arc<dyn VideoElement>> {
        self.sim_video()
            .map(|video| -> Arc<dyn VideoElement> { video })
    }

    fn autoplay_toggle(&self) -> Option<ToggleState> {
        self.with_state(|state| state.autoplay_toggle)
    }

    fn press_autoplay_toggle(&self) -> AppResult<()> {
        self.with_state(|state| {
            let Some(current) = state.autoplay_toggle else {
                return Err(AppError::host(HostError::AutoplayToggle {
                    reason: "toggle not found".to_owned(),
                }));
            };
            state.autoplay_toggle = Some(match current {
                ToggleState::On => ToggleState::Off,
                ToggleState::Off => ToggleState::On,
            });
            state.toggle_presses = state.toggle_presses.saturating_add(1);
            Ok(())
        })
    }

    fn set_player_autoplay(&self, enabled: bool) -> AppResult<bool> {
        Ok(self.with_state(|state| {
            if state.player_autoplay.is_none() {
                return false;
            }
            state.player_autoplay = Some(enabled);
            true
        }))
    }

    fn replace_location(&self, location: &str) -> AppResult<()> {
        url::Url::parse(location).map_err(|err| {
            AppError::host(HostError::InvalidLocation {
                value: location.to_owned(),
                source: err,
            })
        })?;
        self.with_state(|state| state.location = location.to_owned());
        self.announce(location);
        Ok(())
    }

    fn notify(&self, message: &str) {
        tracing::info!("Page notification: {}", message);
        self.with_state(|state| state.notifications.push(message.to_owned()));
    }
}
