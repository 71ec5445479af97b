//! Typed error types for fontpane-preview.

use thiserror::Error;

/// Failures talking to the render backend.
///
/// Both variants are cached against the key that produced them so the panel
/// shows the error instead of retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    /// The backend failed to render the samples.
    #[error("Failed to render font samples: {0}")]
    RenderBackend(String),

    /// The backend replied with something that is not a valid sample set.
    /// Fatal for the chooser session.
    #[error("Malformed response from the render backend: {0}")]
    Protocol(String),
}

impl PreviewError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PreviewError::Protocol(_))
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(e: serde_json::Error) -> Self {
        PreviewError::Protocol(e.to_string())
    }
}
