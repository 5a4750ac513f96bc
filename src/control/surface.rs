use std::sync::Arc;
use std::time::Duration;

use super::input::total_seconds;
use super::view::StatusView;
use crate::bridge::MessageChannel;
use crate::protocol::{Request, Response};

/// Delay before re-reading status after a successful command.
pub const REFRESH_AFTER_ACTION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    SetLoop { minutes: u32, seconds: u32 },
    UseCurrent,
    Disable,
}

impl ControlAction {
    #[must_use]
    pub fn request(&self) -> Request {
        match *self {
            Self::SetLoop { minutes, seconds } => {
                Request::set_loop_time(f64::from(total_seconds(minutes, seconds)))
            }
            Self::UseCurrent => Request::set_current_time(),
            Self::Disable => Request::disable_loop(),
        }
    }

    const fn failure_alert(&self) -> &'static str {
        match self {
            Self::SetLoop { .. } => "Could not set the loop",
            Self::UseCurrent => "Could not use the current time",
            Self::Disable => "Could not disable the loop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Acknowledged; status should be refreshed shortly.
    Sent,
    /// Not sent because the active tab is not a watch page.
    Blocked(StatusView),
    /// Rejected or undeliverable; the user must acknowledge the message.
    Alert(String),
}

pub struct ControlSurface {
    channel: Arc<dyn MessageChannel>,
}

impl ControlSurface {
    #[must_use]
    pub const fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self { channel }
    }

    #[must_use]
    pub const fn channel(&self) -> &Arc<dyn MessageChannel> {
        &self.channel
    }

    /// Queries the active tab and, on a watch page, the Looper's status.
    pub async fn refresh(&self) -> StatusView {
        let tab = match self.channel.active_tab().await {
            Ok(tab) => tab,
            Err(err) => {
                tracing::warn!("Tab query failed: {}", err);
                return StatusView::unreachable(&err.to_string());
            }
        };
        if !tab.is_watch_page() {
            return StatusView::not_watch_page();
        }
        match self.channel.send(Request::get_status()).await {
            Ok(Response::Status(report)) => StatusView::from_status(&report),
            Ok(other) => {
                tracing::warn!("Unexpected status reply: {:?}", other);
                StatusView::unreachable(&other.failure_detail())
            }
            Err(err) => {
                tracing::warn!("Status query failed: {}", err);
                StatusView::unreachable(&err.to_string())
            }
        }
    }

    pub async fn perform(&self, action: ControlAction) -> ActionOutcome {
        let tab = match self.channel.active_tab().await {
            Ok(tab) => tab,
            Err(err) => return ActionOutcome::Alert(alert(action, &err.to_string())),
        };
        if !tab.is_watch_page() {
            return ActionOutcome::Blocked(StatusView::not_watch_page());
        }
        tracing::debug!("Sending {:?}", action);
        match self.channel.send(action.request()).await {
            Ok(response) if response.is_success() => ActionOutcome::Sent,
            Ok(response) => ActionOutcome::Alert(alert(action, &response.failure_detail())),
            Err(err) => ActionOutcome::Alert(alert(action, &err.to_string())),
        }
    }
}

fn alert(action: ControlAction, detail: &str) -> String {
    tracing::warn!("{}: {}", action.failure_alert(), detail);
    format!("{} ({})", action.failure_alert(), detail)
}
