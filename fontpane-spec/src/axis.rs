//! Variable-font axis model.
//!
//! Maps axis values to a fraction of the axis range and back, and models the
//! discretized on-screen track the chooser draws for each axis.

use crate::error::SpecError;
use serde::{Deserialize, Serialize};

/// A variable font design axis, as reported by the render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAxis {
    /// Four character axis tag, e.g. `wght`
    pub tag: String,
    /// Human readable axis name, if the font provides one
    #[serde(default)]
    pub strid: Option<String>,
    pub minimum: f64,
    pub maximum: f64,
    pub default: f64,
    /// Axes flagged hidden are not meant to be exposed in user interfaces
    #[serde(default)]
    pub hidden: bool,
}

impl VariableAxis {
    /// Label to show next to the axis track.
    pub fn label(&self) -> &str {
        self.strid.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.tag)
    }
}

/// Position of `value` within the axis range, in `[0, 1]`.
///
/// Values outside the range are clamped. A single-point axis maps to 0.
pub fn value_to_fraction(axis: &VariableAxis, value: f64) -> f64 {
    let span = axis.maximum - axis.minimum;
    if span <= 0.0 {
        return 0.0;
    }
    let clamped = value.min(axis.maximum).max(axis.minimum);
    (clamped - axis.minimum) / span
}

/// Axis value at `numerator / denominator` of the way through the range.
pub fn fraction_to_value(axis: &VariableAxis, numerator: u32, denominator: u32) -> Result<f64, SpecError> {
    if denominator == 0 {
        return Err(SpecError::InvalidDivision {
            numerator,
            denominator,
        });
    }
    let fraction = f64::from(numerator) / f64::from(denominator);
    Ok(axis.minimum + (axis.maximum - axis.minimum) * fraction)
}

/// Like [`fraction_to_value`], but a zero denominator yields the axis minimum.
pub fn fraction_to_value_or_minimum(axis: &VariableAxis, numerator: u32, denominator: u32) -> f64 {
    fraction_to_value(axis, numerator, denominator).unwrap_or_else(|e| {
        log::warn!("{e}; using minimum of axis {}", axis.tag);
        axis.minimum
    })
}

/// A row of `cells` clickable positions spanning an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTrack {
    cells: u32,
}

impl AxisTrack {
    /// A track of `cells` positions. Needs at least two cells to span a range.
    pub fn new(cells: u32) -> Option<Self> {
        (cells >= 2).then_some(Self { cells })
    }

    pub fn cells(&self) -> u32 {
        self.cells
    }

    /// Denominator used in the `axis:<i>/<N>:<tag>` control ids of this track.
    pub fn last_cell(&self) -> u32 {
        self.cells - 1
    }

    /// Index of the cell showing `value`.
    pub fn selected_cell(&self, axis: &VariableAxis, value: f64) -> u32 {
        let fraction = value_to_fraction(axis, value);
        (fraction * f64::from(self.last_cell())).floor() as u32
    }

    /// Axis value selected by clicking `cell`.
    pub fn cell_value(&self, axis: &VariableAxis, cell: u32) -> Result<f64, SpecError> {
        fraction_to_value(axis, cell.min(self.last_cell()), self.last_cell())
    }
}
