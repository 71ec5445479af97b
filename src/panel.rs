//! The face fine-tuning panel.
//!
//! [`FacePanel`] edits one face slot of a family. Each call to
//! [`FacePanel::view`] computes the preview key for the current setting and
//! screen size, asks the session's [`PreviewCache`] for it and turns the
//! result into a [`PanelView`] for the host's line renderer. Clicks on the
//! rendered controls come back through [`FacePanel::on_click`].
//!
//! Background renders post to the panel's redraw channel; the host calls
//! [`FacePanel::wait_for_redraw`] or [`FacePanel::drain_redraws`] from its
//! event loop and redraws when anything arrived.

use crate::error::Error;
use crate::graphics::{GraphicsManager, GraphicsSink, ImageSlot};
use crate::router::{self, ControlId};
use crate::styles::{StyleGroup, styles_for_variable_data, styles_in_family};
use fontpane_config::{ChooserConfig, FaceSettings, FaceSlot};
use fontpane_preview::{
    PreviewCache, PreviewKey, PreviewLookup, PreviewResult, RedrawRequest, RenderBackend,
    RenderContext,
};
use fontpane_spec::{AxisTrack, parse};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;

/// Rows taken by the title, help line and current setting.
pub const HEADER_ROWS: u32 = 6;

/// Rows between the header and the preview reserved for controls.
const CONTROL_ROWS: u32 = 3;

/// Shown above the axis tracks of a variable font.
pub const FINE_TUNE_HINT: &str = "Fine tune the appearance by clicking in the variable axes below:";

/// Terminal size in cells and pixels per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width_cells: u32,
    pub height_cells: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl ScreenSize {
    /// Canvas size in pixels requested for the samples.
    pub fn preview_size(&self) -> (u32, u32) {
        let rows_left = self.height_cells.saturating_sub(HEADER_ROWS);
        let rows = rows_left.saturating_sub(CONTROL_ROWS).max(1);
        (self.width_cells * self.cell_width, self.cell_height * rows)
    }
}

/// One clickable entry. `control` is `None` for the current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub control: Option<ControlId>,
}

impl Choice {
    pub fn is_current(&self) -> bool {
        self.control.is_none()
    }
}

/// A labelled row of choices, e.g. the upright styles of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub name: String,
    pub choices: Vec<Choice>,
}

/// A variable axis drawn as a row of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisView {
    pub tag: String,
    pub label: String,
    pub track: AxisTrack,
    pub selected_cell: u32,
}

impl AxisView {
    /// Control for clicking `cell`, `None` for the selected cell.
    pub fn control(&self, cell: u32) -> Option<ControlId> {
        (cell != self.selected_cell && cell < self.track.cells()).then(|| ControlId::Axis {
            position: cell,
            last: self.track.last_cell(),
            tag: self.tag.clone(),
        })
    }
}

/// An OpenType feature the font offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureView {
    pub tag: String,
    /// Display text: the applied state (named when the font names the
    /// feature), or the plain name when not applied
    pub text: String,
    /// Unapplied features are drawn dimmed
    pub applied: bool,
    pub control: ControlId,
}

/// Where the sample image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlacement {
    pub slot: ImageSlot,
    /// Row of the preview header line
    pub header_row: u32,
    /// Row the image's top-left corner is placed at
    pub image_row: u32,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Controls and sample for a finished preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub style_rows: Vec<ChoiceRow>,
    pub axes: Vec<AxisView>,
    pub features: Vec<FeatureView>,
    /// `None` when the screen is too short to show the sample
    pub image: Option<ImagePlacement>,
}

/// State of the preview area.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewBody {
    /// Rendering in the background; a redraw will follow.
    Pending,
    /// The backend returned only `available` of the four samples.
    Incomplete { available: usize },
    /// The backend failed for this setting.
    Failed(String),
    Ready(Box<ReadyView>),
}

/// Everything the host needs to draw the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub setting: String,
    /// Message about the last rejected click or edit
    pub notice: Option<String>,
    pub body: PreviewBody,
}

/// A chooser session fine-tuning the faces of one family.
pub struct FacePanel {
    family: String,
    slot: FaceSlot,
    settings: FaceSettings,
    family_styles: Vec<String>,
    config: ChooserConfig,
    cache: PreviewCache,
    redraws: Receiver<RedrawRequest>,
    graphics: GraphicsManager,
    current_key: Option<PreviewKey>,
    current_preview: Option<PreviewResult>,
    notice: Option<String>,
}

impl std::fmt::Debug for FacePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacePanel")
            .field("family", &self.family)
            .field("slot", &self.slot)
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl FacePanel {
    /// Start a session rendering through `backend`.
    pub fn new(backend: Arc<dyn RenderBackend>, config: ChooserConfig) -> Self {
        let (tx, rx) = channel();
        let cache = PreviewCache::new(backend, RenderContext::from_config(&config), tx);
        let graphics = GraphicsManager::new(config.image_number_base);
        Self {
            family: String::new(),
            slot: FaceSlot::Regular,
            settings: FaceSettings::default(),
            family_styles: Vec::new(),
            config,
            cache,
            redraws: rx,
            graphics,
            current_key: None,
            current_preview: None,
            notice: None,
        }
    }

    /// Open the panel on `slot` of `family`.
    ///
    /// `family_styles` lists the styles of a static family for the style
    /// picker; variable fonts take theirs from the preview.
    pub fn on_enter(
        &mut self,
        family: impl Into<String>,
        slot: FaceSlot,
        settings: FaceSettings,
        family_styles: Vec<String>,
    ) {
        self.family = family.into();
        self.slot = slot;
        self.settings = settings;
        self.family_styles = family_styles;
        self.current_key = None;
        self.current_preview = None;
        self.notice = None;
        log::info!("Editing {} face of {}", slot.display_name(), self.family);
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn slot(&self) -> FaceSlot {
        self.slot
    }

    pub fn settings(&self) -> &FaceSettings {
        &self.settings
    }

    /// Setting text of the face being edited.
    pub fn current_setting(&self) -> &str {
        self.settings.get(self.slot)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    fn preview_key(&self, screen: &ScreenSize) -> PreviewKey {
        let (width, height) = screen.preview_size();
        PreviewKey {
            settings: self.settings.clone(),
            width,
            height,
        }
    }

    /// Build the view for `screen`, starting a render if needed.
    ///
    /// Only a protocol failure from the render backend is returned as an
    /// error; it ends the session.
    pub fn view(&mut self, screen: &ScreenSize) -> Result<PanelView, Error> {
        let key = self.preview_key(screen);
        let lookup = self.cache.get_or_start(&key);
        self.current_key = Some(key);

        let body = match lookup {
            PreviewLookup::Pending => PreviewBody::Pending,
            PreviewLookup::Incomplete(set) => PreviewBody::Incomplete {
                available: set.len(),
            },
            PreviewLookup::Failed(e) if e.is_fatal() => {
                log::error!("Render backend protocol failure: {}", e);
                return Err(e.into());
            }
            PreviewLookup::Failed(e) => PreviewBody::Failed(e.to_string()),
            PreviewLookup::Ready(set) => match set.get(self.slot) {
                Some(preview) => {
                    let ready = self.ready_view(screen, preview);
                    self.current_preview = Some(preview.clone());
                    PreviewBody::Ready(Box::new(ready))
                }
                None => PreviewBody::Incomplete { available: set.len() },
            },
        };

        Ok(PanelView {
            title: format!("{}: {} face", self.family, self.slot.display_name()),
            setting: self.current_setting().to_string(),
            notice: self.notice.clone(),
            body,
        })
    }

    fn ready_view(&self, screen: &ScreenSize, preview: &PreviewResult) -> ReadyView {
        let mut row = HEADER_ROWS;

        let variable = preview.is_variable();
        let (groups, current_style) = if variable {
            let groups: Vec<StyleGroup> = styles_for_variable_data(&preview.variable_data)
                .into_iter()
                .filter(|g| g.styles.len() >= 2)
                .collect();
            (groups, preview.variable_named_style.name.as_str())
        } else {
            (styles_in_family(&self.family_styles), preview.style.as_str())
        };
        let style_rows: Vec<ChoiceRow> = groups
            .into_iter()
            .map(|group| ChoiceRow {
                name: group.name,
                choices: group
                    .styles
                    .into_iter()
                    .map(|style| {
                        let control = (style != current_style).then(|| {
                            if variable {
                                ControlId::VariableStyle(style.clone())
                            } else {
                                ControlId::Style(style.clone())
                            }
                        });
                        Choice { label: style, control }
                    })
                    .collect(),
            })
            .collect();
        row += style_rows.len() as u32;

        let axes = self.axis_views(screen, preview);
        if preview.variable_data.axes.iter().any(|a| !a.hidden) {
            // blank line, hint, blank line
            row += 3 + axes.len() as u32;
        }

        let features = feature_views(preview);
        if !features.is_empty() {
            row += 2;
        }

        let cell_height = screen.cell_height.max(1);
        let image_rows = preview.canvas_height.div_ceil(cell_height);
        let image = (screen.height_cells.saturating_sub(row) >= image_rows + 2).then(|| ImagePlacement {
            slot: ImageSlot::Face(self.slot),
            header_row: row + 1,
            image_row: row + 2,
            path: preview.path.clone(),
            width: preview.canvas_width,
            height: preview.canvas_height,
        });

        ReadyView {
            style_rows,
            axes,
            features,
            image,
        }
    }

    fn axis_views(&self, screen: &ScreenSize, preview: &PreviewResult) -> Vec<AxisView> {
        let values = preview.current_axis_values();
        preview
            .variable_data
            .axes
            .iter()
            .filter(|axis| !axis.hidden)
            .filter_map(|axis| {
                let label = axis.label().to_string();
                // "<label>: " precedes the cells
                let cells = screen.width_cells.saturating_sub(label.chars().count() as u32 + 2);
                if (cells as usize) < self.config.min_axis_cells {
                    log::debug!("Skipping axis {}: only {} cells wide", axis.tag, cells);
                    return None;
                }
                let track = AxisTrack::new(cells)?;
                let value = values.get(&axis.tag).copied().unwrap_or(axis.default);
                Some(AxisView {
                    tag: axis.tag.clone(),
                    label,
                    selected_cell: track.selected_cell(axis, value),
                    track,
                })
            })
            .collect()
    }

    /// Handle a click on the control `id`.
    ///
    /// Returns whether the setting changed. Unknown or inapplicable controls
    /// leave the setting alone and set the notice instead.
    pub fn on_click(&mut self, id: &str) -> Result<bool, Error> {
        let control = match id.parse::<ControlId>() {
            Ok(control) => control,
            Err(e) => {
                log::debug!("Ignoring click: {}", e);
                self.notice = Some(e.to_string());
                return Ok(false);
            }
        };
        let Some(preview) = &self.current_preview else {
            log::debug!("Ignoring click on {} before any preview was shown", control);
            return Ok(false);
        };
        let updated = match router::apply(&control, self.current_setting(), &self.family, preview) {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("Click on {} rejected: {}", control, e);
                self.notice = Some(e.to_string());
                return Ok(false);
            }
        };
        log::debug!("Setting for {} is now {:?}", self.slot, updated);
        self.settings.set(self.slot, updated);
        self.notice = None;

        if self.config.sync_render_on_click {
            self.render_current_now()?;
        }
        Ok(true)
    }

    /// Render the new setting at the last screen size on this thread, so the
    /// next view does not flash a pending state.
    ///
    /// A ready sample becomes the current preview, so a second click before
    /// the next view routes against the state the first click produced.
    fn render_current_now(&mut self) -> Result<(), Error> {
        let Some(previous) = &self.current_key else {
            return Ok(());
        };
        let key = PreviewKey {
            settings: self.settings.clone(),
            ..previous.clone()
        };
        match self.cache.render_blocking(&key) {
            PreviewLookup::Failed(e) if e.is_fatal() => Err(e.into()),
            PreviewLookup::Ready(set) => {
                if let Some(preview) = set.get(self.slot) {
                    self.current_preview = Some(preview.clone());
                }
                self.current_key = Some(key);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Replace the setting with text the user typed.
    ///
    /// Text that does not parse is rejected and the setting kept.
    pub fn edit_setting(&mut self, text: &str) -> Result<(), Error> {
        if let Err(e) = parse(text) {
            self.notice = Some(e.to_string());
            return Err(e.into());
        }
        self.settings.set(self.slot, text);
        self.notice = None;
        Ok(())
    }

    /// Block until a background render finishes or `timeout` passes.
    ///
    /// Returns true if at least one redraw arrived. Extra queued redraws are
    /// drained since one redraw covers them all.
    pub fn wait_for_redraw(&self, timeout: Duration) -> bool {
        match self.redraws.recv_timeout(timeout) {
            Ok(_) => {
                self.drain_redraws();
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Redraw channel disconnected");
                false
            }
        }
    }

    /// Take every queued redraw without blocking, returning how many there were.
    pub fn drain_redraws(&self) -> usize {
        self.redraws.try_iter().count()
    }

    /// Allocate the preview image handles with the terminal.
    pub fn initialize_graphics(&mut self, sink: &mut dyn GraphicsSink) {
        self.graphics.initialize(sink);
    }

    /// Record the terminal's reply for a preview image.
    pub fn on_graphics_response(&mut self, image_number: u32, image_id: u32, message: &str) -> Result<(), Error> {
        self.graphics
            .on_response(image_number, image_id, message)
            .map_err(|e| {
                log::error!("{}", e);
                e.into()
            })
    }

    /// Show a sample at the position chosen by [`FacePanel::view`].
    pub fn show_image(&mut self, sink: &mut dyn GraphicsSink, placement: &ImagePlacement) {
        self.graphics.display_image(
            sink,
            placement.slot,
            &placement.path,
            placement.width,
            placement.height,
        );
    }

    /// End the session keeping the edits. The caller persists the result.
    pub fn accept(mut self, sink: &mut dyn GraphicsSink) -> FaceSettings {
        self.graphics.finalize(sink);
        log::info!("Accepted face settings for {}", self.family);
        self.settings
    }

    /// End the session discarding the edits.
    pub fn cancel(mut self, sink: &mut dyn GraphicsSink) {
        self.graphics.finalize(sink);
        log::info!("Cancelled face settings for {}", self.family);
    }
}

fn feature_views(preview: &PreviewResult) -> Vec<FeatureView> {
    let mut views: Vec<FeatureView> = preview
        .features
        .iter()
        .map(|(tag, data)| {
            let name = data.name.as_deref().filter(|n| !n.is_empty());
            let (text, applied) = match (preview.applied_feature(tag), name) {
                (Some(state), Some(name)) => (format!("{name}: {state}"), true),
                (Some(state), None) => (state.to_string(), true),
                (None, Some(name)) => (name.to_string(), false),
                (None, None) => (tag.clone(), false),
            };
            FeatureView {
                tag: tag.clone(),
                text,
                applied,
                control: ControlId::Feature(tag.clone()),
            }
        })
        .collect();
    views.sort_by_cached_key(|v| v.text.to_lowercase());
    views
}
