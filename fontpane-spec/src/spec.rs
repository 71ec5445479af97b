//! Font specification parsing and serialization.
//!
//! Grammar:
//! - `""` or `auto`: the system default font
//! - text without any `=`: a system font name, e.g. `Menlo`
//! - otherwise shell-quoted `key=value` tokens. `family`, `style`,
//!   `postscript_name`, `full_name` and `variable_name` set the matching
//!   field, `features` holds a space separated feature list and every other
//!   key is a variable axis tag with a numeric value.

use crate::error::SpecError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An OpenType feature setting inside a font specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontFeature {
    /// `+tag` or `-tag`
    Bool { tag: String, enabled: bool },
    /// `tag=value`, selecting an alternate by index
    Value { tag: String, value: u32 },
}

impl FontFeature {
    pub fn enabled(tag: impl Into<String>) -> Self {
        FontFeature::Bool {
            tag: tag.into(),
            enabled: true,
        }
    }

    pub fn disabled(tag: impl Into<String>) -> Self {
        FontFeature::Bool {
            tag: tag.into(),
            enabled: false,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            FontFeature::Bool { tag, .. } | FontFeature::Value { tag, .. } => tag,
        }
    }
}

impl fmt::Display for FontFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFeature::Bool { tag, enabled } => {
                write!(f, "{}{}", if *enabled { '+' } else { '-' }, tag)
            }
            FontFeature::Value { tag, value } => write!(f, "{tag}={value}"),
        }
    }
}

impl FromStr for FontFeature {
    type Err = SpecError;

    /// Parse `+tag`, `-tag`, `tag=N` or a bare `tag` (enabled).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let feature = if let Some(tag) = s.strip_prefix('+') {
            FontFeature::enabled(tag)
        } else if let Some(tag) = s.strip_prefix('-') {
            FontFeature::disabled(tag)
        } else if let Some((tag, value)) = s.split_once('=') {
            let value = value.parse::<u32>().map_err(|_| {
                SpecError::malformed(s, format!("feature value in {s} is not a non-negative integer"))
            })?;
            FontFeature::Value {
                tag: tag.to_string(),
                value,
            }
        } else {
            FontFeature::enabled(s)
        };

        let tag = feature.tag();
        if tag.is_empty() || tag.contains(['=', '+', '-']) || tag.contains(char::is_whitespace) {
            return Err(SpecError::malformed(s, format!("{s} is not a valid feature")));
        }
        Ok(feature)
    }
}

/// A parsed font specification.
///
/// When `system` is set the specification is an opaque system font name and
/// serializes as just that name; the structured fields are kept but ignored
/// on output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSpec {
    pub family: Option<String>,
    pub style: Option<String>,
    pub postscript_name: Option<String>,
    pub full_name: Option<String>,
    pub variable_name: Option<String>,
    pub system: Option<String>,
    /// Variable axis overrides by tag
    pub axes: BTreeMap<String, f64>,
    pub features: Vec<FontFeature>,
}

impl FontSpec {
    /// A specification naming a system font.
    pub fn system(name: impl Into<String>) -> Self {
        Self {
            system: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }

    /// Look up the feature setting for `tag`.
    pub fn feature(&self, tag: &str) -> Option<&FontFeature> {
        self.features.iter().find(|f| f.tag() == tag)
    }

    /// Replace the setting for the feature's tag, or append it.
    pub fn set_feature(&mut self, feature: FontFeature) {
        match self.features.iter_mut().find(|f| f.tag() == feature.tag()) {
            Some(existing) => *existing = feature,
            None => self.features.push(feature),
        }
    }

    /// Set an axis override, replacing any previous value for `tag`.
    pub fn set_axis(&mut self, tag: impl Into<String>, value: f64) {
        self.axes.insert(tag.into(), value);
    }
}

/// Parse a font specification.
pub fn parse(text: &str) -> Result<FontSpec, SpecError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "auto" {
        return Ok(FontSpec::system("auto"));
    }
    if !trimmed.contains('=') {
        return Ok(FontSpec::system(trimmed));
    }

    let tokens = shell_words::split(trimmed).map_err(|e| SpecError::malformed(text, e.to_string()))?;
    if tokens.is_empty() {
        return Err(SpecError::malformed(text, "it contains no key=value pairs"));
    }

    let mut spec = FontSpec::default();
    for token in &tokens {
        let Some((key, value)) = token.split_once('=') else {
            return Err(SpecError::malformed(
                text,
                format!("{token} does not contain an ="),
            ));
        };
        match key {
            "family" => spec.family = Some(value.to_string()),
            "style" => spec.style = Some(value.to_string()),
            "full_name" => spec.full_name = Some(value.to_string()),
            "postscript_name" => spec.postscript_name = Some(value.to_string()),
            "variable_name" => spec.variable_name = Some(value.to_string()),
            "features" => {
                for item in value.split_whitespace() {
                    spec.features.push(item.parse()?);
                }
            }
            "" => {
                return Err(SpecError::malformed(text, format!("{token} has an empty key")));
            }
            tag if !is_axis_tag(tag) => {
                return Err(SpecError::malformed(
                    text,
                    format!("{tag} is not a valid axis tag"),
                ));
            }
            tag => {
                let axis_value = value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| SpecError::InvalidAxisValue {
                        tag: tag.to_string(),
                        value: value.to_string(),
                    })?;
                spec.axes.insert(tag.to_string(), axis_value);
            }
        }
    }
    if spec == FontSpec::default() {
        return Err(SpecError::malformed(text, "it sets no font properties"));
    }
    log::trace!("Parsed font specification {:?} as {:?}", text, spec);
    Ok(spec)
}

/// Axis tags are written unquoted, so they are limited to characters that
/// need no shell quoting.
fn is_axis_tag(tag: &str) -> bool {
    tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for FontSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn field(key: &str, value: &str) -> String {
    format!("{key}={}", shell_words::quote(value))
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(system) = &self.system {
            return f.write_str(system);
        }

        let named = [
            ("family", &self.family),
            ("style", &self.style),
            ("postscript_name", &self.postscript_name),
            ("full_name", &self.full_name),
            ("variable_name", &self.variable_name),
        ];
        let mut parts: Vec<String> = named
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| field(key, v)))
            .collect();
        for (tag, value) in &self.axes {
            parts.push(field(tag, &value.to_string()));
        }
        if !self.features.is_empty() {
            let features: Vec<String> = self.features.iter().map(ToString::to_string).collect();
            parts.push(field("features", &features.join(" ")));
        }
        f.write_str(&parts.join(" "))
    }
}
