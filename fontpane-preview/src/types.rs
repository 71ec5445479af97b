//! Rendered sample types and the cache key.
//!
//! These mirror the JSON the render backend sends back, one
//! `PreviewResult` per face slot.

use fontpane_config::{FaceSettings, FaceSlot};
use fontpane_spec::VariableAxis;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Identity of a preview: the four face settings plus the canvas size in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub settings: FaceSettings,
    pub width: u32,
    pub height: u32,
}

/// A named instance of a variable font.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedStyle {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub psname: Option<String>,
    #[serde(default)]
    pub axis_values: BTreeMap<String, f64>,
}

/// Variable font metadata. Empty `axes` means the font is not variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    #[serde(default)]
    pub axes: Vec<VariableAxis>,
    #[serde(default)]
    pub named_styles: Vec<NamedStyle>,
    /// Value written as `variable_name=` in variable selectors
    #[serde(default)]
    pub variations_postscript_name_prefix: String,
}

/// Display metadata for an OpenType feature the font supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sample: Option<String>,
    /// Names of the alternates for index-style features
    #[serde(default)]
    pub params: Vec<String>,
    /// The feature selects an alternate by index rather than on/off
    #[serde(default)]
    pub is_index: bool,
}

/// One rendered sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    /// Image file written by the backend
    pub path: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Style name the setting resolved to
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub psname: String,
    #[serde(default)]
    pub variable_data: VariableData,
    /// Named style applied by the setting, if any (empty name otherwise)
    #[serde(default)]
    pub variable_named_style: NamedStyle,
    /// Explicit axis values applied by the setting
    #[serde(default)]
    pub variable_axis_map: BTreeMap<String, f64>,
    /// Features the font supports
    #[serde(default)]
    pub features: HashMap<String, FeatureData>,
    /// Serialized state (`+liga`, `cv01=2`, ...) of the features the setting applies
    #[serde(default)]
    pub applied_features: HashMap<String, String>,
}

impl PreviewResult {
    pub fn is_variable(&self) -> bool {
        !self.variable_data.axes.is_empty()
    }

    /// Axis values the sample was rendered with: axis defaults, overlaid with
    /// the named style's values or else the explicit axis map.
    pub fn current_axis_values(&self) -> BTreeMap<String, f64> {
        let mut values: BTreeMap<String, f64> = self
            .variable_data
            .axes
            .iter()
            .map(|axis| (axis.tag.clone(), axis.default))
            .collect();
        if self.variable_named_style.name.is_empty() {
            values.extend(self.variable_axis_map.iter().map(|(k, v)| (k.clone(), *v)));
        } else {
            values.extend(
                self.variable_named_style
                    .axis_values
                    .iter()
                    .map(|(k, v)| (k.clone(), *v)),
            );
        }
        values
    }

    pub fn axis(&self, tag: &str) -> Option<&VariableAxis> {
        self.variable_data.axes.iter().find(|axis| axis.tag == tag)
    }

    /// Applied state for `tag`, treating an empty string as not applied.
    pub fn applied_feature(&self, tag: &str) -> Option<&str> {
        self.applied_features
            .get(tag)
            .map(String::as_str)
            .filter(|state| !state.is_empty())
    }
}

/// Samples for the face slots, as returned by one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewSet(HashMap<FaceSlot, PreviewResult>);

impl PreviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: FaceSlot) -> Option<&PreviewResult> {
        self.0.get(&slot)
    }

    pub fn insert(&mut self, slot: FaceSlot, result: PreviewResult) {
        self.0.insert(slot, result);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All four slots are present.
    pub fn is_complete(&self) -> bool {
        FaceSlot::ALL.iter().all(|slot| self.0.contains_key(slot))
    }
}

impl FromIterator<(FaceSlot, PreviewResult)> for PreviewSet {
    fn from_iter<I: IntoIterator<Item = (FaceSlot, PreviewResult)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
