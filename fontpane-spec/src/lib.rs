//! Font specification codec for fontpane.
//!
//! A font specification is a compact, human-editable string describing one
//! face, for example:
//!
//! ```text
//! family="Fira Code" style=Retina features="+zero -liga cv01=2"
//! family=Recursive variable_name=RecursiveVariable wght=620 CASL=1
//! Menlo
//! ```
//!
//! This crate provides:
//! - `FontSpec` / `FontFeature` with round-trip parse and serialize
//! - The axis model mapping variable-font axis values to on-screen fractions
//! - Builders for the variable-font selector strings written by the chooser

pub mod axis;
pub mod error;
pub mod selector;
pub mod spec;

// Re-export main types for convenience
pub use axis::{AxisTrack, VariableAxis, fraction_to_value, fraction_to_value_or_minimum, value_to_fraction};
pub use error::SpecError;
pub use selector::{VariableSelection, variable_selector};
pub use spec::{FontFeature, FontSpec, parse};
