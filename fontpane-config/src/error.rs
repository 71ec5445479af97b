//! Typed error variants for the fontpane-config crate.
//!
//! `ConfigError` covers config file I/O and validation. `load`/`save` still
//! return `anyhow::Result`; callers who want to match on a specific failure
//! can downcast:
//!
//! ```rust,no_run
//! use fontpane_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!             ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!         }
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A face slot name that is not one of `font_family`, `bold_font`,
/// `italic_font` or `bold_italic_font`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown face slot '{0}'")]
pub struct ParseSlotError(pub String);
