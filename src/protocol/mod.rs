//! Command/response contract between the Control Surface and the Looper.
//!
//! Requests arrive as `{ "action": ..., "time"?: ... }`. Responses are one of
//! three JSON shapes: a status report, `{ "success": bool }` or
//! `{ "error": "..." }`.
mod command;
mod message;


pub use command::{Command, Rejection};
pub use message::{
    ACTION_DISABLE_LOOP, ACTION_GET_STATUS, ACTION_SET_CURRENT_TIME, ACTION_SET_LOOP_TIME,
    ErrorReply, INVALID_LOOP_TIME, Request, Response, StatusReport, TabInfo, UNRECOGNIZED_ACTION,
};
