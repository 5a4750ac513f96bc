use crate::protocol::StatusReport;
use crate::video::seconds_to_duration;

pub const OPEN_VIDEO_PROMPT: &str = "Open a YouTube video";
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the video";
pub const LOOP_INACTIVE: &str = "Loop inactive";
const CONNECTING: &str = "Connecting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopTone {
    Neutral,
    Active,
    Inactive,
    Error,
}

/// What the Control Surface shows below its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub video_line: String,
    pub loop_line: String,
    pub tone: LoopTone,
    pub controls_enabled: bool,
}

impl StatusView {
    #[must_use]
    pub fn connecting() -> Self {
        Self {
            video_line: CONNECTING.to_owned(),
            loop_line: String::new(),
            tone: LoopTone::Neutral,
            controls_enabled: false,
        }
    }

    #[must_use]
    pub fn not_watch_page() -> Self {
        Self {
            video_line: OPEN_VIDEO_PROMPT.to_owned(),
            loop_line: String::new(),
            tone: LoopTone::Neutral,
            controls_enabled: false,
        }
    }

    #[must_use]
    pub fn from_status(report: &StatusReport) -> Self {
        let (loop_line, tone) = if report.is_active {
            (
                format!("Loop active: {}", format_clock(report.loop_time)),
                LoopTone::Active,
            )
        } else {
            (LOOP_INACTIVE.to_owned(), LoopTone::Inactive)
        };
        Self {
            video_line: format!("Current time: {}", format_whole_clock(report.current_time)),
            loop_line,
            tone,
            controls_enabled: true,
        }
    }

    #[must_use]
    pub fn unreachable(detail: &str) -> Self {
        Self {
            video_line: UNREACHABLE_MESSAGE.to_owned(),
            loop_line: detail.to_owned(),
            tone: LoopTone::Error,
            controls_enabled: false,
        }
    }
}

/// Formats seconds as `m:ss`, flooring fractions. Invalid values show as
/// `0:00`.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let whole = seconds_to_duration(seconds).map_or(0, |duration| duration.as_secs());
    format_whole_clock(whole)
}

fn format_whole_clock(seconds: u64) -> String {
    let minutes = seconds.checked_div(60).unwrap_or(0);
    let rest = seconds.checked_rem(60).unwrap_or(0);
    format!("{}:{:02}", minutes, rest)
}
