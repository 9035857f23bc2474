//! The apply engine: one forward pass routing rules onto the document.
//!
//! Rules are processed strictly in source order, and each rule's matches in
//! document order; the resulting append order *is* the cascade. There is no
//! specificity math anywhere: a later rule's declarations land after an
//! earlier rule's on the same element, which is exactly what a renderer
//! without stylesheet support needs.

use kuchiki::NodeRef;

use crate::border::parse_border_shorthand;
use crate::css::{Rule, Stylesheet};
use crate::debug::DebugLogger;
use crate::metrics::ApplyMetrics;
use crate::pseudo::{is_pseudo_selector, PseudoBucket};
use crate::rewrite::{insert_spacer, RewriteState, SpacerPosition};

/// What the renderer can do with one `(property, tag)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyAction {
    /// Write into the element's style attribute.
    Inline,
    /// Style lands on a `<span>` wrapped around the element's children;
    /// block elements ignore these properties inline.
    WrapChildren,
    /// Style lands on a `<div>` wrapped around the element itself.
    WrapElement,
    /// Simulate the border with spacer images beside the element.
    BorderSpacer,
    /// The renderer cannot express this at all; the declaration vanishes.
    Drop,
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Pure function of property and tag; selector specificity and declaration
/// order play no part here.
pub(crate) fn classify(property: &str, tag: &str) -> PropertyAction {
    match property {
        "color" | "font-size" if is_heading(tag) || tag == "p" || tag == "td" => {
            PropertyAction::WrapChildren
        }
        "background-color" if is_heading(tag) || tag == "p" => PropertyAction::WrapElement,
        "border" | "border-top" | "border-bottom" if tag == "div" || is_heading(tag) => {
            PropertyAction::BorderSpacer
        }
        "border" | "border-top" | "border-bottom" if tag == "p" => PropertyAction::Drop,
        _ => PropertyAction::Inline,
    }
}

fn spacer_positions(property: &str) -> &'static [SpacerPosition] {
    match property {
        "border-top" => &[SpacerPosition::Top],
        "border-bottom" => &[SpacerPosition::Bottom],
        _ => &[SpacerPosition::Top, SpacerPosition::Bottom],
    }
}

/// Append declarations to a node's style attribute, creating it on first
/// use. Elements that never accumulate anything never gain the attribute.
fn append_style(node: &NodeRef, declarations: &str) {
    if let Some(element) = node.as_element() {
        let mut attributes = element.attributes.borrow_mut();
        let merged = match attributes.get("style") {
            Some(existing) => format!("{}{}", existing, declarations),
            None => declarations.to_string(),
        };
        attributes.insert("style", merged);
    }
}

impl Stylesheet {
    /// Apply every rule to `document`, mutating it in place.
    ///
    /// The tree is exclusively the caller's for the duration of the call;
    /// the stylesheet itself is read-only and reusable across documents.
    pub fn apply(&self, document: &NodeRef) -> ApplyMetrics {
        self.apply_with_debug(document, None)
    }

    pub fn apply_with_debug(
        &self,
        document: &NodeRef,
        debug: Option<&DebugLogger>,
    ) -> ApplyMetrics {
        let mut state = RewriteState::default();
        let mut bucket = PseudoBucket::default();
        let mut metrics = ApplyMetrics::default();

        for rule in &self.rules {
            metrics.rules_seen += 1;

            // A rule with any pseudo selector is never applied inline, even
            // if it also carries plain selectors.
            if rule.selectors.iter().any(|s| is_pseudo_selector(s)) {
                metrics.rules_pseudo += 1;
                if let Some(logger) = debug {
                    logger.event("rule.pseudo", &rule.text);
                }
                bucket.push(&rule.text);
                continue;
            }

            for selector in &rule.selectors {
                // Matches are snapshotted before any mutation; this rule's
                // own rewrites must not feed back into its match set.
                let matches: Vec<NodeRef> = match document.select(selector) {
                    Ok(found) => found.map(|m| m.as_node().clone()).collect(),
                    Err(()) => {
                        metrics.selectors_skipped += 1;
                        if let Some(logger) = debug {
                            logger.event("selector.unsupported", selector);
                            logger.count("selector.unsupported", 1);
                        }
                        continue;
                    }
                };
                for element in matches {
                    apply_rule(rule, &element, &mut state, &mut metrics);
                }
            }
        }

        if bucket.emit_into(document) {
            if let Some(logger) = debug {
                logger.event("pseudo.emitted", "head");
            }
        }
        if let Some(logger) = debug {
            logger.summary("apply");
        }
        metrics
    }
}

fn apply_rule(rule: &Rule, element: &NodeRef, state: &mut RewriteState, metrics: &mut ApplyMetrics) {
    let Some(data) = element.as_element() else {
        return;
    };
    let tag = data.name.local.to_ascii_lowercase();

    let mut direct = String::new();
    let mut child_wrapped = String::new();
    let mut element_wrapped = String::new();

    for declaration in &rule.declarations {
        match classify(&declaration.property, &tag) {
            PropertyAction::Inline => direct.push_str(&declaration.to_inline()),
            PropertyAction::WrapChildren => child_wrapped.push_str(&declaration.to_inline()),
            PropertyAction::WrapElement => element_wrapped.push_str(&declaration.to_inline()),
            PropertyAction::BorderSpacer => {
                let spec = parse_border_shorthand(&declaration.value);
                for position in spacer_positions(&declaration.property) {
                    insert_spacer(element, &spec, *position);
                    metrics.spacers_inserted += 1;
                }
            }
            PropertyAction::Drop => metrics.declarations_dropped += 1,
        }
    }

    if !direct.is_empty() {
        append_style(element, &direct);
        metrics.elements_styled += 1;
    }
    if !child_wrapped.is_empty() {
        let (span, created) = state.wrap_children(element);
        if created {
            metrics.child_wrappers_created += 1;
        }
        append_style(&span, &child_wrapped);
    }
    if !element_wrapped.is_empty() {
        let (div, created) = state.wrap_element(element);
        if created {
            metrics.element_wrappers_created += 1;
        }
        append_style(&div, &element_wrapped);
    }
}
