//! Typed error types for fontpane-spec.

use thiserror::Error;

/// Failures while parsing a font specification or mapping axis values.
///
/// All of these are local to a single user edit: the caller rejects the edit
/// and keeps the previous valid setting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// The specification text could not be tokenized or contains a token
    /// that is not a `key=value` pair.
    #[error("The font specification {spec} is invalid: {reason}")]
    MalformedSpec {
        /// The full specification text.
        spec: String,
        /// What was wrong, naming the offending token.
        reason: String,
    },

    /// An axis value is not a finite number.
    #[error("Invalid value '{value}' for variable axis {tag}")]
    InvalidAxisValue {
        /// Axis tag, e.g. `wght`.
        tag: String,
        /// The text that failed to parse.
        value: String,
    },

    /// An axis fraction was requested with a zero denominator.
    #[error("Axis position {numerator}/{denominator} has a zero denominator")]
    InvalidDivision { numerator: u32, denominator: u32 },
}

impl SpecError {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        SpecError::MalformedSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
