// ABOUTME: Declarative pane size hints.
// ABOUTME: Absolute pixel sizes or percentages of the container extent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested initial size of a pane.
///
/// In config files a bare number is an absolute size and a string such as
/// `"25%"` is a percentage of the container extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSizeHint", into = "RawSizeHint")]
pub enum SizeHint {
    Absolute(f64),
    Percent(f64),
}

impl SizeHint {
    /// Convert to pixels for a container of the given extent.
    ///
    /// The result is not validated; callers reject non-finite values.
    pub fn resolve(&self, container_extent: f64) -> f64 {
        match *self {
            SizeHint::Absolute(size) => size,
            SizeHint::Percent(percent) => percent / 100.0 * container_extent,
        }
    }
}

impl From<f64> for SizeHint {
    fn from(size: f64) -> Self {
        SizeHint::Absolute(size)
    }
}

impl fmt::Display for SizeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeHint::Absolute(size) => write!(f, "{}", size),
            SizeHint::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SizeHintError {
    #[error("Invalid size hint: {0:?}")]
    NotANumber(String),
}

impl FromStr for SizeHint {
    type Err = SizeHintError;

    /// Strings are always percentages; the `%` suffix is optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        number
            .parse::<f64>()
            .map(SizeHint::Percent)
            .map_err(|_| SizeHintError::NotANumber(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSizeHint {
    Absolute(f64),
    Text(String),
}

impl TryFrom<RawSizeHint> for SizeHint {
    type Error = SizeHintError;

    fn try_from(raw: RawSizeHint) -> Result<Self, Self::Error> {
        match raw {
            RawSizeHint::Absolute(size) => Ok(SizeHint::Absolute(size)),
            RawSizeHint::Text(text) => text.parse(),
        }
    }
}

impl From<SizeHint> for RawSizeHint {
    fn from(hint: SizeHint) -> Self {
        match hint {
            SizeHint::Absolute(size) => RawSizeHint::Absolute(size),
            SizeHint::Percent(_) => RawSizeHint::Text(hint.to_string()),
        }
    }
}
