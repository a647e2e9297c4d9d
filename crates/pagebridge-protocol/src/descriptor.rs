//! Element descriptor reported on selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of characters of text content carried by a descriptor.
pub const DEFAULT_TEXT_LIMIT: usize = 200;

/// Immutable snapshot of an element at the moment it was selected.
///
/// Field names on the wire match what the injected selector script sends
/// (`tagName`, `className`, `id`, `textContent`, `xpath`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Uppercase tag name, e.g. `DIV`.
    pub tag_name: String,
    /// Value of the class attribute, possibly empty.
    #[serde(default)]
    pub class_name: String,
    /// Value of the id attribute, possibly empty.
    #[serde(default)]
    pub id: String,
    /// Trimmed text content, clipped to the text limit.
    #[serde(default)]
    pub text_content: String,
    /// Structural address of the element within its document.
    #[serde(rename = "xpath")]
    pub path: String,
}

impl ElementDescriptor {
    /// Create a descriptor, clipping `text_content` to [`DEFAULT_TEXT_LIMIT`].
    pub fn new(
        tag_name: impl Into<String>,
        class_name: impl Into<String>,
        id: impl Into<String>,
        text_content: &str,
        path: impl Into<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_uppercase(),
            class_name: class_name.into(),
            id: id.into(),
            text_content: clip_text(text_content, DEFAULT_TEXT_LIMIT),
            path: path.into(),
        }
    }

    /// Whether the element carried an id attribute.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Class names as individual tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name.split_ascii_whitespace()
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        if self.has_id() {
            write!(f, " id=\"{}\"", self.id)?;
        }
        if !self.class_name.is_empty() {
            write!(f, " class=\"{}\"", self.class_name)?;
        }
        write!(f, "> at {}", self.path)
    }
}

/// Trim `text` and keep at most `limit` characters.
///
/// Clipping counts characters, not bytes, so multi-byte text never splits a
/// code point.
pub fn clip_text(text: &str, limit: usize) -> String {
    text.trim().chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_new_uppercases_tag() {
        let desc = ElementDescriptor::new("div", "card", "", "Hello", "/html/body/div");
        assert_eq!(desc.tag_name, "DIV");
        assert!(!desc.has_id());
    }

    #[test]
    fn test_clip_text_trims_and_caps() {
        let long = format!("  {}  ", "a".repeat(500));
        let clipped = clip_text(&long, DEFAULT_TEXT_LIMIT);
        assert_eq!(clipped.chars().count(), 200);
        assert!(clipped.chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_clip_text_short_text_untouched() {
        assert_eq!(clip_text("  short \n", 200), "short");
    }

    #[test]
    fn test_clip_text_counts_chars() {
        let text = "é".repeat(300);
        let clipped = clip_text(&text, 200);
        assert_eq!(clipped.chars().count(), 200);
        assert_eq!(clipped.len(), 400);
    }

    #[test]
    fn test_descriptor_wire_names() {
        let desc = ElementDescriptor::new("h1", "title big", "hero", "Welcome", "//*[@id=\"hero\"]");
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["tagName"], "H1");
        assert_eq!(json["className"], "title big");
        assert_eq!(json["textContent"], "Welcome");
        assert_eq!(json["xpath"], "//*[@id=\"hero\"]");
    }

    #[test]
    fn test_descriptor_deserialize_with_missing_optional_fields() {
        let json = r#"{"tagName":"P","xpath":"/html/body/p"}"#;
        let desc: ElementDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc.tag_name, "P");
        assert!(desc.class_name.is_empty());
        assert!(desc.id.is_empty());
        assert!(desc.text_content.is_empty());
    }

    #[test]
    fn test_descriptor_classes() {
        let desc = ElementDescriptor::new("a", " btn  primary ", "", "", "/html/body/a");
        let classes: Vec<_> = desc.classes().collect();
        assert_eq!(classes, vec!["btn", "primary"]);
    }

    #[test]
    fn test_descriptor_display() {
        let desc = ElementDescriptor::new("button", "cta", "buy", "Buy", "//*[@id=\"buy\"]");
        let display = desc.to_string();
        assert!(display.starts_with("<BUTTON"));
        assert!(display.contains("id=\"buy\""));
        assert!(display.contains("class=\"cta\""));
    }
}
