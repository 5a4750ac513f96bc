use crate::host::{HostPage, ToggleState};
use crate::video::disable_autoplay_param;

/// Turns off every autoplay mechanism the page exposes so the site does not
/// move on to another video. Each step is best effort.
///
/// Returns the rewritten address when the `autoplay` query parameter had to
/// be changed.
#[must_use]
pub fn suppress_autoplay(page: &dyn HostPage) -> Option<String> {
    if page.autoplay_toggle() == Some(ToggleState::On) {
        match page.press_autoplay_toggle() {
            Ok(()) => tracing::debug!("Autoplay toggle switched off."),
            Err(err) => tracing::warn!("Failed to switch off autoplay toggle: {}", err),
        }
    }

    match page.set_player_autoplay(false) {
        Ok(true) => tracing::debug!("Player autoplay flag cleared."),
        Ok(false) => {}
        Err(err) => tracing::warn!("Failed to clear player autoplay flag: {}", err),
    }

    let location = page.location();
    match disable_autoplay_param(&location) {
        Ok(Some(rewritten)) => match page.replace_location(&rewritten) {
            Ok(()) => Some(rewritten),
            Err(err) => {
                tracing::warn!("Failed to rewrite autoplay parameter: {}", err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("Page address '{}' is not a URL: {}", location, err);
            None
        }
    }
}
