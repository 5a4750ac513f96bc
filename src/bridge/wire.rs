use serde::{Deserialize, Serialize};

use crate::protocol::{Request, Response, TabInfo};

/// One line on the bridge connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    QueryTab { id: u64 },
    Tab { id: u64, url: Option<String> },
    Command { id: u64, request: Request },
    Reply { id: u64, response: Response },
    TabUpdated(TabInfo),
    Error { message: String },
}

impl WireMessage {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::QueryTab { .. } => "query_tab",
            Self::Tab { .. } => "tab",
            Self::Command { .. } => "command",
            Self::Reply { .. } => "reply",
            Self::TabUpdated(_) => "tab_updated",
            Self::Error { .. } => "error",
        }
    }
}
