//! Variable-font selector specifications.
//!
//! A selector picks a point in a variable font's design space either by
//! named style or by explicit axis values, never both:
//!
//! ```text
//! family=Recursive variable_name=RecursiveVariable style="Mono Casual Bold"
//! family=Recursive variable_name=RecursiveVariable CASL=1 MONO=1 wght=700
//! ```
//!
//! Tags left out of an axis selection fall back to the font's defaults at
//! render time.

use crate::spec::FontSpec;
use std::collections::BTreeMap;

/// How a selector addresses the variable font's design space.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSelection {
    /// A named instance, e.g. `Bold`
    NamedStyle(String),
    /// Explicit axis values by tag
    Axes(BTreeMap<String, f64>),
}

/// Build the selector specification for `family` / `variable_name`.
pub fn variable_selector(family: &str, variable_name: &str, selection: VariableSelection) -> FontSpec {
    let mut spec = FontSpec {
        family: Some(family.to_string()),
        variable_name: Some(variable_name.to_string()),
        ..FontSpec::default()
    };
    match selection {
        VariableSelection::NamedStyle(style) => spec.style = Some(style),
        VariableSelection::Axes(axes) => spec.axes = axes,
    }
    spec
}
