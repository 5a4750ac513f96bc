//! Page-address and playback-clock helpers shared by the looper and the
//! control surface.
mod id;
mod position;

#[cfg(test)]
mod tests;

pub use id::{AUTOPLAY_PARAM, VIDEO_PARAM, VideoId, disable_autoplay_param, is_watch_page};
pub use position::{PlaybackPosition, seconds_to_duration};
