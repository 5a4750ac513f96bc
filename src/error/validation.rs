use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimeFieldKind {
    #[error("minutes")]
    Minutes,
    #[error("seconds")]
    Seconds,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid loop time '{value}'. Use seconds (90) or minutes:seconds (1:30).")]
    InvalidTimestamp { value: String },
    #[error("Loop time {field} must be <= {max} (got {value}).")]
    TimestampOutOfRange {
        field: TimeFieldKind,
        value: u64,
        max: u32,
    },
    #[error("Invalid video entry '{value}'. Use <id>:<seconds>.")]
    InvalidVideoEntry { value: String },
    #[error("Video entry '{value}' needs a duration >= 1 second.")]
    VideoDurationZero { value: String },
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
    #[error("Invalid boolean '{value}'. Use true/false, yes/no, on/off or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Refusing to prune without --force (or preview with --dry-run).")]
    PruneNeedsForce,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
