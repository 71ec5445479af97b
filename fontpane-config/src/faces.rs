//! Face slots and the per-slot font settings edited by a chooser session.

use crate::error::ParseSlotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four faces a terminal font configuration carries.
///
/// The wire names (`font_family`, `bold_font`, ...) are the keys used by the
/// render backend in both requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceSlot {
    #[serde(rename = "font_family")]
    Regular,
    #[serde(rename = "bold_font")]
    Bold,
    #[serde(rename = "italic_font")]
    Italic,
    #[serde(rename = "bold_italic_font")]
    BoldItalic,
}

impl FaceSlot {
    /// All slots in display order.
    pub const ALL: [FaceSlot; 4] = [
        FaceSlot::Regular,
        FaceSlot::Bold,
        FaceSlot::Italic,
        FaceSlot::BoldItalic,
    ];

    /// Wire name of the slot.
    pub fn key(self) -> &'static str {
        match self {
            FaceSlot::Regular => "font_family",
            FaceSlot::Bold => "bold_font",
            FaceSlot::Italic => "italic_font",
            FaceSlot::BoldItalic => "bold_italic_font",
        }
    }

    /// Human readable face name used in panel titles.
    pub fn display_name(self) -> &'static str {
        match self {
            FaceSlot::Regular => "Regular",
            FaceSlot::Bold => "Bold",
            FaceSlot::Italic => "Italic",
            FaceSlot::BoldItalic => "Bold-Italic",
        }
    }
}

impl fmt::Display for FaceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FaceSlot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "font_family" => Ok(FaceSlot::Regular),
            "bold_font" => Ok(FaceSlot::Bold),
            "italic_font" => Ok(FaceSlot::Italic),
            "bold_italic_font" => Ok(FaceSlot::BoldItalic),
            other => Err(ParseSlotError(other.to_string())),
        }
    }
}

/// The font setting string for each face.
///
/// Each value is a font specification in the textual format understood by
/// `fontpane-spec` (for example `family="Fira Code" style=Bold` or `auto`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceSettings {
    #[serde(default = "crate::defaults::font_family")]
    pub font_family: String,
    #[serde(default = "crate::defaults::styled_font")]
    pub bold_font: String,
    #[serde(default = "crate::defaults::styled_font")]
    pub italic_font: String,
    #[serde(default = "crate::defaults::styled_font")]
    pub bold_italic_font: String,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            font_family: crate::defaults::font_family(),
            bold_font: crate::defaults::styled_font(),
            italic_font: crate::defaults::styled_font(),
            bold_italic_font: crate::defaults::styled_font(),
        }
    }
}

impl FaceSettings {
    /// Setting for `slot`.
    pub fn get(&self, slot: FaceSlot) -> &str {
        match slot {
            FaceSlot::Regular => &self.font_family,
            FaceSlot::Bold => &self.bold_font,
            FaceSlot::Italic => &self.italic_font,
            FaceSlot::BoldItalic => &self.bold_italic_font,
        }
    }

    /// Replace the setting for `slot`.
    pub fn set(&mut self, slot: FaceSlot, setting: impl Into<String>) {
        let setting = setting.into();
        match slot {
            FaceSlot::Regular => self.font_family = setting,
            FaceSlot::Bold => self.bold_font = setting,
            FaceSlot::Italic => self.italic_font = setting,
            FaceSlot::BoldItalic => self.bold_italic_font = setting,
        }
    }
}
