use std::sync::Arc;

use super::VideoElement;
use crate::error::AppResult;

/// Pressed state of the site's autoplay toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    On,
    Off,
}

pub trait HostPage: Send + Sync {
    /// Full current page address.
    fn location(&self) -> String;

    /// The page's single video element, when present.
    fn find_video(&self) -> Option<Arc<dyn VideoElement>>;

    /// `None` when the page has no autoplay toggle.
    fn autoplay_toggle(&self) -> Option<ToggleState>;

    /// # Errors
    ///
    /// Returns an error when the toggle is missing or cannot be pressed.
    fn press_autoplay_toggle(&self) -> AppResult<()>;

    /// Sets the player configuration's autoplay flag. Returns `false` when the
    /// page exposes no player configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration rejects the write.
    fn set_player_autoplay(&self, enabled: bool) -> AppResult<bool>;

    /// Replaces the current address without a navigation.
    ///
    /// # Errors
    ///
    /// Returns an error when the address is rejected.
    fn replace_location(&self, location: &str) -> AppResult<()>;

    /// Shows a short message to the user.
    fn notify(&self, message: &str);
}
