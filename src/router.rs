//! Control routing.
//!
//! Clickable parts of the panel carry an opaque id of the form
//! `scheme:payload`:
//!
//! | id                        | effect                                         |
//! |---------------------------|------------------------------------------------|
//! | `style:<name>`            | switch to a named style of a static family     |
//! | `variable_style:<name>`   | switch to a named instance of a variable font  |
//! | `feature:<tag>`           | toggle (or cycle) an OpenType feature          |
//! | `axis:<i>/<N>:<tag>`      | set a variable axis to `i/N` of its range      |
//!
//! Ids are parsed into [`ControlId`] at the boundary and applied against the
//! preview currently on screen by [`apply`].

use crate::error::RouterError;
use fontpane_preview::PreviewResult;
use fontpane_spec::{
    FontFeature, FontSpec, VariableSelection, fraction_to_value_or_minimum, parse,
    variable_selector,
};
use std::fmt;
use std::str::FromStr;

/// A decoded control id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlId {
    Style(String),
    VariableStyle(String),
    Feature(String),
    /// Cell `position` of a track whose last cell is `last`
    Axis { position: u32, last: u32, tag: String },
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::Style(name) => write!(f, "style:{name}"),
            ControlId::VariableStyle(name) => write!(f, "variable_style:{name}"),
            ControlId::Feature(tag) => write!(f, "feature:{tag}"),
            ControlId::Axis { position, last, tag } => write!(f, "axis:{position}/{last}:{tag}"),
        }
    }
}

impl FromStr for ControlId {
    type Err = RouterError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let (scheme, payload) = id
            .split_once(':')
            .ok_or_else(|| RouterError::unknown(id, "missing scheme"))?;
        if payload.is_empty() {
            return Err(RouterError::unknown(id, "empty payload"));
        }
        match scheme {
            "style" => Ok(ControlId::Style(payload.to_string())),
            "variable_style" => Ok(ControlId::VariableStyle(payload.to_string())),
            "feature" => Ok(ControlId::Feature(payload.to_string())),
            "axis" => parse_axis(id, payload),
            other => Err(RouterError::unknown(id, format!("unknown scheme {other}"))),
        }
    }
}

fn parse_axis(id: &str, payload: &str) -> Result<ControlId, RouterError> {
    let (position, tag) = payload
        .split_once(':')
        .ok_or_else(|| RouterError::unknown(id, "axis position has no tag"))?;
    let (numerator, denominator) = position
        .split_once('/')
        .ok_or_else(|| RouterError::unknown(id, "axis position is not i/N"))?;
    let position: u32 = numerator
        .parse()
        .map_err(|_| RouterError::unknown(id, "axis cell is not an integer"))?;
    let last: u32 = denominator
        .parse()
        .map_err(|_| RouterError::unknown(id, "axis cell count is not an integer"))?;
    if tag.is_empty() {
        return Err(RouterError::unknown(id, "empty axis tag"));
    }
    if position > last {
        return Err(RouterError::unknown(id, "axis cell is past the end of the track"));
    }
    Ok(ControlId::Axis {
        position,
        last,
        tag: tag.to_string(),
    })
}

/// Apply `control` to `setting`, the specification of the face being edited.
///
/// `family` is the family the panel was opened for and `preview` the sample
/// currently displayed for this face. Returns the new setting text.
pub fn apply(
    control: &ControlId,
    setting: &str,
    family: &str,
    preview: &PreviewResult,
) -> Result<String, RouterError> {
    log::debug!("Applying control {} to setting {:?}", control, setting);
    let spec = match control {
        ControlId::Style(name) => FontSpec {
            family: Some(family.to_string()),
            style: Some(name.clone()),
            ..FontSpec::default()
        },
        ControlId::VariableStyle(name) => {
            let data = &preview.variable_data;
            if !preview.is_variable() {
                return Err(RouterError::unknown(control, "font is not variable"));
            }
            if !data.named_styles.is_empty() && !data.named_styles.iter().any(|s| &s.name == name) {
                return Err(RouterError::unknown(control, "no such named style"));
            }
            variable_selector(
                family,
                &data.variations_postscript_name_prefix,
                VariableSelection::NamedStyle(name.clone()),
            )
        }
        ControlId::Feature(tag) => {
            let feature = next_feature_state(control, tag, preview)?;
            let mut spec = editable_spec(setting, family, preview)?;
            spec.set_feature(feature);
            spec
        }
        ControlId::Axis { position, last, tag } => {
            let axis = preview
                .axis(tag)
                .ok_or_else(|| RouterError::unknown(control, "font has no such axis"))?;
            let value = fraction_to_value_or_minimum(axis, *position, *last);
            let mut values = preview.current_axis_values();
            values.insert(tag.clone(), value);
            variable_selector(
                family,
                &preview.variable_data.variations_postscript_name_prefix,
                VariableSelection::Axes(values),
            )
        }
    };
    Ok(spec.to_string())
}

/// Parse `setting` for editing. A system font name has no structured fields
/// to hold features, so it is replaced by the family and resolved style.
fn editable_spec(setting: &str, family: &str, preview: &PreviewResult) -> Result<FontSpec, RouterError> {
    let spec = parse(setting)?;
    if !spec.is_system() {
        return Ok(spec);
    }
    log::debug!("Rebasing system font setting {:?} on family {}", setting, family);
    Ok(FontSpec {
        family: Some(family.to_string()),
        style: Some(preview.style.clone()).filter(|s| !s.is_empty()),
        ..FontSpec::default()
    })
}

fn next_feature_state(control: &ControlId, tag: &str, preview: &PreviewResult) -> Result<FontFeature, RouterError> {
    let data = preview
        .features
        .get(tag)
        .ok_or_else(|| RouterError::unknown(control, "font has no such feature"))?;
    let applied = preview.applied_feature(tag);

    if data.is_index {
        let current = match applied.and_then(|s| s.parse::<FontFeature>().ok()) {
            Some(FontFeature::Value { value, .. }) => value,
            Some(FontFeature::Bool { enabled: true, .. }) => 1,
            _ => 0,
        };
        let max = (data.params.len() as u32).max(1);
        let value = if current >= max { 0 } else { current + 1 };
        return Ok(FontFeature::Value {
            tag: tag.to_string(),
            value,
        });
    }

    let on = applied.is_some_and(|s| s.starts_with('+') || s.ends_with("=1"));
    Ok(if on {
        FontFeature::disabled(tag)
    } else {
        FontFeature::enabled(tag)
    })
}
