//! Chooser configuration: loading, saving and path resolution.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Text style forwarded to the render backend with every sample request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points
    #[serde(default = "crate::defaults::font_size")]
    pub font_size: f64,
    #[serde(default = "crate::defaults::dpi")]
    pub dpi_x: f64,
    #[serde(default = "crate::defaults::dpi")]
    pub dpi_y: f64,
    /// Sample text color (`#rrggbb`)
    #[serde(default = "crate::defaults::foreground")]
    pub foreground: String,
    /// Sample background color (`#rrggbb`)
    #[serde(default = "crate::defaults::background")]
    pub background: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: crate::defaults::font_size(),
            dpi_x: crate::defaults::dpi(),
            dpi_y: crate::defaults::dpi(),
            foreground: crate::defaults::foreground(),
            background: crate::defaults::background(),
        }
    }
}

/// User configuration for the font chooser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChooserConfig {
    #[serde(default)]
    pub text_style: TextStyle,

    /// Directory the render backend writes sample images to.
    /// `None` means a per-session temporary directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Render synchronously after a click when the new preview is not cached
    #[serde(default = "crate::defaults::sync_render_on_click")]
    pub sync_render_on_click: bool,

    /// First image number used for the preview graphics handles
    #[serde(default = "crate::defaults::image_number_base")]
    pub image_number_base: u32,

    /// Axis tracks narrower than this many cells are not drawn
    #[serde(default = "crate::defaults::min_axis_cells")]
    pub min_axis_cells: usize,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self {
            text_style: TextStyle::default(),
            output_dir: None,
            sync_render_on_click: crate::defaults::sync_render_on_click(),
            image_number_base: crate::defaults::image_number_base(),
            min_axis_cells: crate::defaults::min_axis_cells(),
        }
    }
}

impl ChooserConfig {
    /// Load configuration from the default path, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ChooserConfig = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check field values that serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.text_style.font_size.is_finite() && self.text_style.font_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "text_style.font_size must be positive, got {}",
                self.text_style.font_size
            )));
        }
        if self.min_axis_cells < 2 {
            return Err(ConfigError::Validation(format!(
                "min_axis_cells must be at least 2, got {}",
                self.min_axis_cells
            )));
        }
        Ok(())
    }

    /// Get the configuration file path (`~/.config/fontpane/config.yaml`)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("fontpane").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("fontpane").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
    }
}
