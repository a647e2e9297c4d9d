//! Structural addressing of elements.
//!
//! An element with an id is addressed by that id alone. Anything else gets an
//! absolute, XPath-style path from the root element, where each step names the
//! tag and, for all but the first same-tag sibling, its 1-based position among
//! same-tag siblings:
//!
//! ```text
//! /html/body/div[2]/span
//! //*[@id="hero"]
//! ```
//!
//! Paths are only stable while the document is unchanged.

use pagebridge_dom::{Document, NodeId};

/// Address `node` within `doc`.
///
/// Returns an empty string when `node` is not an element.
pub fn element_path(doc: &Document, node: NodeId) -> String {
    if !doc.is_element(node) {
        return String::new();
    }

    let id = doc.element_id(node);
    if !id.is_empty() {
        return id_selector(id);
    }

    let mut steps = Vec::new();
    let mut current = Some(node);
    while let Some(element) = current.filter(|&n| doc.is_element(n)) {
        steps.push(path_step(doc, element));
        current = doc.parent(element);
    }
    steps.reverse();
    format!("/{}", steps.join("/"))
}

/// `//*[@id=...]` with the id quoted so the expression stays well-formed.
pub fn id_selector(id: &str) -> String {
    format!("//*[@id={}]", quote_literal(id))
}

fn path_step(doc: &Document, element: NodeId) -> String {
    let tag = doc.tag_name(element).unwrap_or_default();
    let same_tag_before = doc
        .preceding_siblings(element)
        .filter(|&sibling| doc.tag_name(sibling) == Some(tag))
        .count();

    let tag = tag.to_ascii_lowercase();
    if same_tag_before > 0 {
        format!("{}[{}]", tag, same_tag_before + 1)
    } else {
        tag
    }
}

/// XPath 1.0 has no escapes inside string literals.
fn quote_literal(value: &str) -> String {
    match (value.contains('"'), value.contains('\'')) {
        (false, _) => format!("\"{}\"", value),
        (true, false) => format!("'{}'", value),
        (true, true) => {
            let parts: Vec<String> = value.split('"').map(|p| format!("\"{}\"", p)).collect();
            format!("concat({})", parts.join(", '\"', "))
        }
    }
}
