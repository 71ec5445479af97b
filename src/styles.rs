//! Grouping of style names for the style pickers.

use fontpane_preview::{NamedStyle, VariableData};

/// A labelled row of style names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleGroup {
    pub name: String,
    pub styles: Vec<String>,
}

fn is_italic_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}

fn is_italic_instance(style: &NamedStyle) -> bool {
    let slanted = style.axis_values.get("ital").is_some_and(|v| *v > 0.0)
        || style.axis_values.get("slnt").is_some_and(|v| *v != 0.0);
    slanted || is_italic_name(&style.name)
}

fn split_groups(upright: Vec<String>, italic: Vec<String>) -> Vec<StyleGroup> {
    [("Upright", upright), ("Italic", italic)]
        .into_iter()
        .filter(|(_, styles)| !styles.is_empty())
        .map(|(name, styles)| StyleGroup {
            name: name.to_string(),
            styles,
        })
        .collect()
}

/// Group the styles of a static family, keeping their order.
pub fn styles_in_family<S: AsRef<str>>(styles: &[S]) -> Vec<StyleGroup> {
    let (italic, upright): (Vec<String>, Vec<String>) = styles
        .iter()
        .map(|s| s.as_ref().to_string())
        .partition(|s| is_italic_name(s));
    split_groups(upright, italic)
}

/// Group the named instances of a variable font, keeping their order.
pub fn styles_for_variable_data(data: &VariableData) -> Vec<StyleGroup> {
    let mut upright = Vec::new();
    let mut italic = Vec::new();
    for style in data.named_styles.iter().filter(|s| !s.name.is_empty()) {
        if is_italic_instance(style) {
            italic.push(style.name.clone());
        } else {
            upright.push(style.name.clone());
        }
    }
    split_groups(upright, italic)
}
