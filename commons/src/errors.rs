//! Command-line conversion errors.

use failure::Fail;
use std::fmt;

/// Render an option id the way it is typed on the command line.
pub fn option_label(id: &str) -> String {
    if id.chars().count() == 1 {
        format!("-{}", id)
    } else {
        format!("--{}", id)
    }
}

/// Failure while turning parsed options into a build configuration.
///
/// A conversion error means no configuration was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionError {
    /// An option value failed domain-specific parsing.
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },
    /// Two options were given that cannot be combined.
    ConflictingOptions { first: String, second: String },
}

impl ConversionError {
    pub fn invalid_value(option: &str, value: &str, reason: impl fmt::Display) -> Self {
        ConversionError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn conflicting(first: &str, second: &str) -> Self {
        ConversionError::ConflictingOptions {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::InvalidValue { option, reason, .. } => {
                write!(f, "invalid value for {}: {}", option_label(option), reason)
            }
            ConversionError::ConflictingOptions { first, second } => write!(
                f,
                "the {} and {} options cannot be used together",
                option_label(first),
                option_label(second)
            ),
        }
    }
}

impl Fail for ConversionError {}
