//! Structural rewriting: the mutations that inline attributes alone cannot
//! express.
//!
//! Three shapes, all idempotent per source element within one apply pass:
//! wrap-children (a `<span>` that absorbs the element's children and carries
//! the style), wrap-element (a `<div>` that takes the element's place and
//! demotes it to sole child), and border spacers (fixed-height `<img>`
//! strips before/after the element).

use std::collections::HashMap;
use std::rc::Rc;

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::{Attribute, ExpandedName, NodeRef};

use crate::border::SpacerSpec;

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacerPosition {
    Top,
    Bottom,
}

/// The URL an external image server answers with a colored strip. The format
/// is an interop contract; do not change it.
pub fn spacer_url(color_hex: &str) -> String {
    format!("/galakei/spacer/{}", color_hex)
}

pub(crate) fn new_html_element(tag: &str, attributes: Vec<(&str, String)>) -> NodeRef {
    let name = QualName::new(None, Namespace::from(HTML_NS), LocalName::from(tag));
    let attributes = attributes.into_iter().map(|(attr_name, value)| {
        (
            ExpandedName::new("", attr_name),
            Attribute {
                prefix: None,
                value,
            },
        )
    });
    NodeRef::new_element(name, attributes)
}

pub(crate) fn serialize_node(node: &NodeRef) -> String {
    let mut out = Vec::new();
    let _ = node.serialize(&mut out);
    String::from_utf8_lossy(&out).into_owned()
}

/// Wrapper bookkeeping for one apply pass.
///
/// Keyed by node identity, not content: two structurally equal elements are
/// distinct targets. A second rule matching the same element reuses the
/// recorded wrapper instead of nesting another one. This state must not
/// outlive the pass.
#[derive(Default)]
pub(crate) struct RewriteState {
    child_wrappers: HashMap<usize, NodeRef>,
    element_wrappers: HashMap<usize, NodeRef>,
}

fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(&node.0) as usize
}

impl RewriteState {
    /// Get or create the `<span>` holding `element`'s children. Returns the
    /// wrapper and whether this call created it.
    pub fn wrap_children(&mut self, element: &NodeRef) -> (NodeRef, bool) {
        let key = node_key(element);
        if let Some(span) = self.child_wrappers.get(&key) {
            return (span.clone(), false);
        }
        let span = new_html_element("span", Vec::new());
        let children: Vec<NodeRef> = element.children().collect();
        for child in children {
            span.append(child);
        }
        element.append(span.clone());
        self.child_wrappers.insert(key, span.clone());
        (span, true)
    }

    /// Get or create the `<div>` standing in `element`'s place. Returns the
    /// wrapper and whether this call created it.
    pub fn wrap_element(&mut self, element: &NodeRef) -> (NodeRef, bool) {
        let key = node_key(element);
        if let Some(div) = self.element_wrappers.get(&key) {
            return (div.clone(), false);
        }
        let div = new_html_element("div", Vec::new());
        element.insert_before(div.clone());
        div.append(element.clone());
        self.element_wrappers.insert(key, div.clone());
        (div, true)
    }
}

/// Insert one spacer image beside `element`. Every qualifying border
/// declaration inserts its own spacer; there is no cross-declaration merge.
pub(crate) fn insert_spacer(element: &NodeRef, spec: &SpacerSpec, position: SpacerPosition) {
    let img = new_html_element(
        "img",
        vec![
            ("src", spacer_url(&spec.color_hex)),
            ("width", "100%".to_string()),
            ("height", spec.height_px.to_string()),
        ],
    );
    match position {
        SpacerPosition::Top => element.insert_before(img),
        SpacerPosition::Bottom => element.insert_after(img),
    }
}
