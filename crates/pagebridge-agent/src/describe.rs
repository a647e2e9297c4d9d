//! Element descriptors.

use pagebridge_config::SelectorConfig;
use pagebridge_dom::{Document, DomError, NodeId};
use pagebridge_protocol::{clip_text, ElementDescriptor};

use crate::addressing::element_path;

/// Snapshot `node` as it should be reported upstream.
///
/// The selector's own marker classes are left out of `class_name`, so the
/// host sees the page's classes only.
pub fn describe(
    doc: &Document,
    node: NodeId,
    config: &SelectorConfig,
) -> Result<ElementDescriptor, DomError> {
    let tag_name = match doc.tag_name(node) {
        Some(tag) => tag.to_string(),
        None if doc.exists(node) => return Err(DomError::NotAnElement(node)),
        None => return Err(DomError::StaleNode(node)),
    };

    let class_name = doc
        .class_list(node)
        .into_iter()
        .filter(|class| !config.is_marker_class(class))
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ElementDescriptor {
        tag_name,
        class_name,
        id: doc.element_id(node).to_string(),
        text_content: clip_text(&doc.text_content(node), config.text_limit),
        path: element_path(doc, node),
    })
}
