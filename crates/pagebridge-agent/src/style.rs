//! Highlight stylesheet for the hover and selection markers.

use pagebridge_config::SelectorConfig;
use pagebridge_dom::{Document, DomError, NodeId};
use tracing::debug;

/// Id of the `<style>` element installed next to the script with `marker_id`.
pub fn style_element_id(marker_id: &str) -> String {
    format!("{}-style", marker_id)
}

/// CSS for the two marker classes.
pub fn stylesheet(config: &SelectorConfig) -> String {
    let color = &config.highlight_color;
    format!(
        ".{hover} {{ outline: 2px dashed {color} !important; outline-offset: 2px; \
         cursor: pointer !important; transition: outline 0.2s ease; }}\n\
         .{selected} {{ outline: 3px solid {color} !important; outline-offset: 2px; \
         background-color: {tint} !important; transition: all 0.2s ease; }}\n",
        hover = config.hover_class,
        selected = config.selected_class,
        color = color,
        tint = tint(color),
    )
}

/// Append the stylesheet to `<head>` (or the root element when the document
/// has no head). Returns the existing element if one is already installed.
pub fn install_styles(
    doc: &mut Document,
    marker_id: &str,
    config: &SelectorConfig,
) -> Result<NodeId, DomError> {
    let id = style_element_id(marker_id);
    if let Some(existing) = doc.get_element_by_id(&id) {
        debug!("Highlight styles already present as {}", existing);
        return Ok(existing);
    }

    let parent = doc.head().unwrap_or_else(|| doc.root());
    let style = doc.append_element(parent, "style")?;
    doc.set_attribute(style, "id", &id)?;
    doc.set_text_content(style, &stylesheet(config))?;
    debug!("Installed highlight styles as {}", style);
    Ok(style)
}

/// A 5% alpha fill of a `#rrggbb` color; anything else is used as-is.
fn tint(color: &str) -> String {
    let rgb = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .and_then(|hex| {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });
    match rgb {
        Some((r, g, b)) => format!("rgba({}, {}, {}, 0.05)", r, g, b),
        None => color.to_string(),
    }
}
