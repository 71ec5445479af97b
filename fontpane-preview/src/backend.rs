//! Interface to the external sample renderer.
//!
//! The renderer receives the four face settings and a canvas size and writes
//! one sample image per face into `output_dir`. How the request travels (a
//! JSON line over a pipe, an in-process call) is up to the implementation;
//! [`RenderRequest::to_message`] and [`decode_response`] cover the JSON
//! message shapes for pipe based backends.

use crate::error::PreviewError;
use crate::types::{PreviewKey, PreviewSet};
use fontpane_config::{ChooserConfig, TextStyle};
use serde::Serialize;
use std::path::PathBuf;

/// Per-session parameters shared by every render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub text_style: TextStyle,
    pub output_dir: PathBuf,
}

impl RenderContext {
    /// Context from config, falling back to `fontpane` under the system temp dir.
    pub fn from_config(config: &ChooserConfig) -> Self {
        Self {
            text_style: config.text_style.clone(),
            output_dir: config
                .output_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("fontpane")),
        }
    }
}

/// A request to render samples for all four faces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub text_style: TextStyle,
    pub font_family: String,
    pub bold_font: String,
    pub italic_font: String,
    pub bold_italic_font: String,
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
}

impl RenderRequest {
    /// Action name of the request message.
    pub const ACTION: &'static str = "render_family_samples";

    pub fn new(key: &PreviewKey, context: &RenderContext) -> Self {
        Self {
            text_style: context.text_style.clone(),
            font_family: key.settings.font_family.clone(),
            bold_font: key.settings.bold_font.clone(),
            italic_font: key.settings.italic_font.clone(),
            bold_italic_font: key.settings.bold_italic_font.clone(),
            width: key.width,
            height: key.height,
            output_dir: context.output_dir.clone(),
        }
    }

    /// The request as a JSON message object carrying its `action`.
    pub fn to_message(&self) -> Result<serde_json::Value, PreviewError> {
        let mut message = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut message {
            map.insert("action".to_string(), Self::ACTION.into());
        }
        Ok(message)
    }
}

/// Decode a render reply: a JSON object mapping slot names to samples.
pub fn decode_response(json: &str) -> Result<PreviewSet, PreviewError> {
    let set: PreviewSet = serde_json::from_str(json)?;
    log::debug!("Decoded render reply with {} samples", set.len());
    Ok(set)
}

/// Something that can render font samples.
///
/// Called from cache worker threads and, for the synchronous fast path, from
/// the UI thread. Implementations must be safe to call concurrently for
/// different requests.
pub trait RenderBackend: Send + Sync {
    fn render_family_samples(&self, request: &RenderRequest) -> Result<PreviewSet, PreviewError>;
}

impl<F> RenderBackend for F
where
    F: Fn(&RenderRequest) -> Result<PreviewSet, PreviewError> + Send + Sync,
{
    fn render_family_samples(&self, request: &RenderRequest) -> Result<PreviewSet, PreviewError> {
        self(request)
    }
}
