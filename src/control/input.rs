use crate::error::{TimeFieldKind, ValidationError};

pub const MAX_MINUTES: u32 = 999;
pub const MAX_SECONDS: u32 = 59;

/// A digits-only numeric field clamped to `[0, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInput {
    kind: TimeFieldKind,
    text: String,
}

impl TimeInput {
    #[must_use]
    pub const fn minutes() -> Self {
        Self {
            kind: TimeFieldKind::Minutes,
            text: String::new(),
        }
    }

    #[must_use]
    pub const fn seconds() -> Self {
        Self {
            kind: TimeFieldKind::Seconds,
            text: String::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TimeFieldKind {
        self.kind
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        match self.kind {
            TimeFieldKind::Minutes => MAX_MINUTES,
            TimeFieldKind::Seconds => MAX_SECONDS,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends a digit. Anything else is rejected and `false` returned.
    pub fn push(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        self.text.push(ch);
        self.clamp();
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Replaces the contents, keeping only digits.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().filter(char::is_ascii_digit).collect();
        self.clamp();
    }

    /// Empty counts as zero.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.text.parse::<u32>().unwrap_or(0)
    }

    /// Called when focus leaves the field. Seconds are shown with two digits.
    pub fn blur(&mut self) {
        if self.kind == TimeFieldKind::Seconds {
            self.text = format!("{:02}", self.value());
        }
    }

    fn clamp(&mut self) {
        let max = self.max();
        let within = self
            .text
            .parse::<u64>()
            .is_ok_and(|value| value <= u64::from(max));
        if !within && !self.text.is_empty() {
            self.text = max.to_string();
        }
    }
}

/// `minutes * 60 + seconds`.
#[must_use]
pub const fn total_seconds(minutes: u32, seconds: u32) -> u32 {
    minutes.saturating_mul(60).saturating_add(seconds)
}

/// Parses `90` or `1:30` into whole seconds.
///
/// # Errors
///
/// Returns an error when the text is not one of those forms or the seconds
/// part of `m:ss` exceeds 59.
pub fn parse_timestamp(value: &str) -> Result<u32, ValidationError> {
    let trimmed = value.trim();
    let invalid = || ValidationError::InvalidTimestamp {
        value: value.to_owned(),
    };
    let parse_part = |part: &str| -> Result<u64, ValidationError> {
        if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<u64>().map_err(|_err| invalid())
    };

    match trimmed.split_once(':') {
        None => {
            let seconds = parse_part(trimmed)?;
            u32::try_from(seconds).map_err(|_err| invalid())
        }
        Some((minutes, seconds)) => {
            let minutes = parse_part(minutes)?;
            let seconds = parse_part(seconds)?;
            if minutes > u64::from(MAX_MINUTES) {
                return Err(ValidationError::TimestampOutOfRange {
                    field: TimeFieldKind::Minutes,
                    value: minutes,
                    max: MAX_MINUTES,
                });
            }
            if seconds > u64::from(MAX_SECONDS) {
                return Err(ValidationError::TimestampOutOfRange {
                    field: TimeFieldKind::Seconds,
                    value: seconds,
                    max: MAX_SECONDS,
                });
            }
            let minutes = u32::try_from(minutes).map_err(|_err| invalid())?;
            let seconds = u32::try_from(seconds).map_err(|_err| invalid())?;
            Ok(total_seconds(minutes, seconds))
        }
    }
}
