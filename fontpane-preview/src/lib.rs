//! Preview rendering for the fontpane font chooser.
//!
//! This crate provides:
//! - The rendered sample types returned by the render backend
//! - `RenderBackend`, the interface to the external sample renderer
//! - `PreviewCache`, which deduplicates render requests by exact parameters
//!   and populates results on background threads
//!
//! # Architecture
//!
//! The panel asks the cache for the `PreviewKey` it wants to show. The first
//! lookup of a key stores a pending placeholder and starts exactly one
//! render on a worker thread. When the render finishes the result replaces
//! the placeholder and a `RedrawRequest` is posted to the panel's channel so
//! the UI thread can look again.

pub mod backend;
pub mod cache;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use backend::{RenderBackend, RenderContext, RenderRequest, decode_response};
pub use cache::{PreviewCache, PreviewLookup, RedrawRequest};
pub use error::PreviewError;
pub use types::{FeatureData, NamedStyle, PreviewKey, PreviewResult, PreviewSet, VariableData};
