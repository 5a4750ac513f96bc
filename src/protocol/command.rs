use super::message::{
    ACTION_DISABLE_LOOP, ACTION_GET_STATUS, ACTION_SET_CURRENT_TIME, ACTION_SET_LOOP_TIME,
    INVALID_LOOP_TIME, Request, Response, UNRECOGNIZED_ACTION,
};

/// A request the Looper understands, with its argument validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetLoopTime { time: f64 },
    SetCurrentTime,
    DisableLoop,
    GetStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unrecognized,
    InvalidTime,
}

impl Rejection {
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Unrecognized => Response::error(UNRECOGNIZED_ACTION),
            Self::InvalidTime => Response::error(INVALID_LOOP_TIME),
        }
    }
}

impl Command {
    /// Validates a raw request.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Unrecognized`] for unknown actions and
    /// [`Rejection::InvalidTime`] when `setLoopTime` lacks a finite,
    /// non-negative time.
    pub fn parse(request: &Request) -> Result<Self, Rejection> {
        match request.action.as_str() {
            ACTION_SET_LOOP_TIME => match request.time {
                Some(time) if time.is_finite() && time >= 0.0 => Ok(Self::SetLoopTime { time }),
                _ => Err(Rejection::InvalidTime),
            },
            ACTION_SET_CURRENT_TIME => Ok(Self::SetCurrentTime),
            ACTION_DISABLE_LOOP => Ok(Self::DisableLoop),
            ACTION_GET_STATUS => Ok(Self::GetStatus),
            _ => Err(Rejection::Unrecognized),
        }
    }
}
