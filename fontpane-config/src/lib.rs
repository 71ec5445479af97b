//! Configuration system for the fontpane font chooser.
//!
//! This crate provides the plain data types shared by the other fontpane
//! crates:
//!
//! - `FaceSlot` / `FaceSettings`: the four font faces (regular, bold, italic,
//!   bold-italic) a chooser session edits
//! - `ChooserConfig`: user configuration loaded from YAML
//! - Typed errors for config I/O and slot parsing

pub mod config;
pub mod defaults;
pub mod error;
pub mod faces;

// Re-export main types for convenience
pub use config::{ChooserConfig, TextStyle};
pub use error::{ConfigError, ParseSlotError};
pub use faces::{FaceSettings, FaceSlot};
