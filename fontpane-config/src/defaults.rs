//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes so that a
//! partial config file fills in the rest.

pub fn font_family() -> String {
    "monospace".to_string()
}

pub fn styled_font() -> String {
    "auto".to_string()
}

pub fn font_size() -> f64 {
    11.0
}

pub fn dpi() -> f64 {
    96.0
}

pub fn foreground() -> String {
    "#dddddd".to_string()
}

pub fn background() -> String {
    "#000000".to_string()
}

pub fn sync_render_on_click() -> bool {
    true // Avoids a flash of the old preview after a click
}

pub fn image_number_base() -> u32 {
    7891230
}

pub fn min_axis_cells() -> usize {
    5
}
