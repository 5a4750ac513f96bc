use serde::{Deserialize, Serialize};

use crate::video::is_watch_page;

pub const ACTION_SET_LOOP_TIME: &str = "setLoopTime";
pub const ACTION_SET_CURRENT_TIME: &str = "setCurrentTime";
pub const ACTION_DISABLE_LOOP: &str = "disableLoop";
pub const ACTION_GET_STATUS: &str = "getStatus";

pub const UNRECOGNIZED_ACTION: &str = "Unrecognized action";
pub const INVALID_LOOP_TIME: &str = "Invalid loop time";

/// Raw request as carried by the message channel. The action stays a string
/// so unknown actions can be answered instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl Request {
    #[must_use]
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_owned(),
            time: None,
        }
    }

    #[must_use]
    pub fn set_loop_time(seconds: f64) -> Self {
        Self {
            action: ACTION_SET_LOOP_TIME.to_owned(),
            time: Some(seconds),
        }
    }

    #[must_use]
    pub fn set_current_time() -> Self {
        Self::new(ACTION_SET_CURRENT_TIME)
    }

    #[must_use]
    pub fn disable_loop() -> Self {
        Self::new(ACTION_DISABLE_LOOP)
    }

    #[must_use]
    pub fn get_status() -> Self {
        Self::new(ACTION_GET_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub is_active: bool,
    pub loop_time: f64,
    pub current_time: u64,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

/// Variant order matters for decoding: a status report is tried first since
/// its fields are the most specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Status(StatusReport),
    Ack { success: bool },
    Error(ErrorReply),
}

impl Response {
    #[must_use]
    pub const fn ok() -> Self {
        Self::Ack { success: true }
    }

    #[must_use]
    pub fn error(message: &str) -> Self {
        Self::Error(ErrorReply {
            error: message.to_owned(),
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ack { success: true })
    }

    /// Human-readable detail for a response that is not a plain success.
    #[must_use]
    pub fn failure_detail(&self) -> String {
        match self {
            Self::Error(reply) => reply.error.clone(),
            Self::Ack { success } => format!("success: {}", success),
            Self::Status(_) => "unexpected status response".to_owned(),
        }
    }
}

/// What the broker knows about the active tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabInfo {
    pub url: Option<String>,
}

impl TabInfo {
    #[must_use]
    pub const fn new(url: Option<String>) -> Self {
        Self { url }
    }

    #[must_use]
    pub fn is_watch_page(&self) -> bool {
        self.url.as_deref().is_some_and(is_watch_page)
    }
}
