//! Typed error types for the fontpane panel.

use fontpane_preview::PreviewError;
use fontpane_spec::SpecError;
use thiserror::Error;

/// Failures resolving a clicked control.
///
/// Either way the setting is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouterError {
    /// The id is malformed or names something the current preview does not offer.
    #[error("Unknown control '{id}': {reason}")]
    UnknownControl { id: String, reason: String },

    /// The current setting could not be parsed, so it cannot be edited.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl RouterError {
    pub(crate) fn unknown(id: impl ToString, reason: impl Into<String>) -> Self {
        RouterError::UnknownControl {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by the host terminal's graphics handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("Failed to load image with error: {0}")]
    LoadFailed(String),

    #[error("Graphics response for unknown image number {0}")]
    UnknownImage(u32),
}

/// Top-level error for a chooser session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

impl Error {
    /// The session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Preview(e) if e.is_fatal())
    }
}
