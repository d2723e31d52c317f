//! Block layout
//!
//! Stacks every element in `<body>` vertically at full viewport width.
//! An element's height is its `data-height` attribute when present,
//! otherwise the sum of its children, otherwise one line per line of text.

use fz_dom::{DOMRect, Document, NodeId};

/// Height of one line of text in pixels
pub const LINE_HEIGHT: f64 = 24.0;

const SKIPPED: &[&str] = &["head", "script", "style", "template", "title", "meta", "link"];

/// Assign a layout box to every element under `<body>`. Returns the
/// document height.
pub fn layout(document: &mut Document, viewport_width: f64) -> f64 {
    let body = document.body();
    let height = layout_block(document, body, 0.0, viewport_width);
    let root = document.document_element();
    document.set_rect(root, DOMRect::from_xywh(0.0, 0.0, viewport_width, height));
    tracing::debug!("Laid out document: {}px tall", height);
    height
}

fn layout_block(document: &mut Document, node: NodeId, top: f64, width: f64) -> f64 {
    let children: Vec<NodeId> = document
        .tree()
        .element_children(node)
        .filter(|&child| {
            document
                .tree()
                .element(child)
                .is_some_and(|el| !SKIPPED.contains(&el.tag.as_str()))
        })
        .collect();

    let mut cursor = top;
    for child in &children {
        cursor += layout_block(document, *child, cursor, width);
    }
    let stacked = cursor - top;

    let fixed = document
        .get_attr(node, "data-height")
        .and_then(|h| h.trim().trim_end_matches("px").parse::<f64>().ok());
    let height = match fixed {
        Some(h) => h.max(0.0),
        None if !children.is_empty() => stacked,
        None => text_lines(&document.text_content(node)) as f64 * LINE_HEIGHT,
    };
    document.set_rect(node, DOMRect::from_xywh(0.0, top, width, height));
    height
}

fn text_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}
