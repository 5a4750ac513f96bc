//! Control Surface logic, independent of how it is rendered.
mod input;
mod poller;
mod surface;
mod view;

#[cfg(test)]
mod tests;

pub use input::{MAX_MINUTES, MAX_SECONDS, TimeInput, parse_timestamp, total_seconds};
pub use poller::spawn_status_poller;
pub use surface::{ActionOutcome, ControlAction, ControlSurface, REFRESH_AFTER_ACTION};
pub use view::{LOOP_INACTIVE, LoopTone, OPEN_VIDEO_PROMPT, StatusView, UNREACHABLE_MESSAGE, format_clock};
