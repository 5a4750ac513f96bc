use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Playback resume was rejected: {reason}")]
    ResumeRejected { reason: String },
    #[error("Seek failed: {reason}")]
    SeekFailed { reason: String },
    #[error("Autoplay toggle could not be pressed: {reason}")]
    AutoplayToggle { reason: String },
    #[error("Page address '{value}' is not a valid URL: {source}")]
    InvalidLocation {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Page context has shut down.")]
    PageClosed,
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
