//! Shared integration test helpers for fontpane.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` suppresses warnings when a file only uses some of
//! the helpers.

#![allow(dead_code)]

use fontpane::{ChooserConfig, FaceSlot, GraphicsSink, PreviewError, PreviewResult, PreviewSet, RenderBackend, RenderRequest};
use fontpane_preview::{FeatureData, NamedStyle, VariableData};
use fontpane_spec::VariableAxis;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub fn axis(tag: &str, minimum: f64, maximum: f64, default: f64) -> VariableAxis {
    VariableAxis {
        tag: tag.to_string(),
        strid: None,
        minimum,
        maximum,
        default,
        hidden: false,
    }
}

pub fn named_style(name: &str, axes: &[(&str, f64)]) -> NamedStyle {
    NamedStyle {
        name: name.to_string(),
        psname: None,
        axis_values: axes.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>(),
    }
}

pub fn feature(name: Option<&str>) -> FeatureData {
    FeatureData {
        name: name.map(str::to_string),
        ..FeatureData::default()
    }
}

pub fn index_feature(params: &[&str]) -> FeatureData {
    FeatureData {
        params: params.iter().map(|p| p.to_string()).collect(),
        is_index: true,
        ..FeatureData::default()
    }
}

/// A static font preview offering `liga` and `zero`.
pub fn static_preview(style: &str) -> PreviewResult {
    let mut preview = PreviewResult {
        style: style.to_string(),
        psname: format!("FiraCode-{style}"),
        ..PreviewResult::default()
    };
    preview.features.insert("liga".to_string(), feature(None));
    preview
        .features
        .insert("zero".to_string(), feature(Some("Slashed zero")));
    preview
}

/// A variable font preview with weight and width axes.
pub fn variable_preview() -> PreviewResult {
    PreviewResult {
        style: "Regular".to_string(),
        variable_data: VariableData {
            axes: vec![axis("wght", 100.0, 900.0, 400.0), axis("wdth", 75.0, 125.0, 100.0)],
            named_styles: vec![
                named_style("Thin", &[("wght", 100.0)]),
                named_style("Regular", &[("wght", 400.0)]),
                named_style("Bold", &[("wght", 700.0)]),
            ],
            variations_postscript_name_prefix: "InterVariable".to_string(),
        },
        ..PreviewResult::default()
    }
}

/// Render backend returning the same sample for every slot.
pub struct FakeBackend {
    calls: AtomicUsize,
    sample: Mutex<PreviewResult>,
    failure: Option<PreviewError>,
    /// Report each slot's requested features as applied
    echo_features: bool,
    /// Record of the settings of each request, in order
    requests: Mutex<Vec<RenderRequest>>,
}

impl FakeBackend {
    pub fn new(sample: PreviewResult) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            sample: Mutex::new(sample),
            failure: None,
            echo_features: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Like `new`, but each sample reports the features its setting asks for.
    pub fn echoing_features(sample: PreviewResult) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            sample: Mutex::new(sample),
            failure: None,
            echo_features: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: PreviewError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            sample: Mutex::new(PreviewResult::default()),
            failure: Some(error),
            echo_features: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_sample(&self, sample: PreviewResult) {
        *self.sample.lock() = sample;
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().clone()
    }
}

impl RenderBackend for FakeBackend {
    fn render_family_samples(&self, request: &RenderRequest) -> Result<PreviewSet, PreviewError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        let sample = self.sample.lock().clone();
        Ok(FaceSlot::ALL
            .into_iter()
            .map(|slot| {
                let mut result = PreviewResult {
                    path: request.output_dir.join(format!("{}-{}.rgba", slot.key(), self.calls())),
                    canvas_width: request.width,
                    // A sample canvas height, if set, is the rendered text height
                    canvas_height: match sample.canvas_height {
                        0 => request.height,
                        h => h.min(request.height),
                    },
                    ..sample.clone()
                };
                if self.echo_features {
                    let setting = match slot {
                        FaceSlot::Regular => &request.font_family,
                        FaceSlot::Bold => &request.bold_font,
                        FaceSlot::Italic => &request.italic_font,
                        FaceSlot::BoldItalic => &request.bold_italic_font,
                    };
                    if let Ok(spec) = fontpane_spec::parse(setting) {
                        for feature in spec.features {
                            result
                                .applied_features
                                .insert(feature.tag().to_string(), feature.to_string());
                        }
                    }
                }
                (slot, result)
            })
            .collect())
    }
}

/// Config writing samples into `dir`.
pub fn config_in(dir: &TempDir) -> ChooserConfig {
    ChooserConfig {
        output_dir: Some(dir.path().to_path_buf()),
        ..ChooserConfig::default()
    }
}

/// Graphics sink recording every command as text.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<String>,
}

impl GraphicsSink for RecordingSink {
    fn allocate(&mut self, image_number: u32) {
        self.commands.push(format!("allocate {image_number}"));
    }

    fn transmit(&mut self, image_number: u32, path: &Path, width: u32, height: u32) {
        self.commands
            .push(format!("transmit {image_number} {} {width}x{height}", path.display()));
    }

    fn place(&mut self, image_number: u32) {
        self.commands.push(format!("place {image_number}"));
    }

    fn delete(&mut self, image_number: u32) {
        self.commands.push(format!("delete {image_number}"));
    }
}
