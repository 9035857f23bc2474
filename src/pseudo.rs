//! Pseudo-class rules cannot be resolved to a fixed inline style, so they
//! are carried verbatim into a single `<style>` block in the document head.
//! Legacy i-mode renderers honor exactly that one CDATA-guarded block.

use kuchiki::NodeRef;

use crate::rewrite::new_html_element;

/// Ordered collection of pseudo-rule source texts, emitted once per pass.
#[derive(Debug, Default)]
pub(crate) struct PseudoBucket {
    rules: Vec<String>,
}

impl PseudoBucket {
    pub fn push(&mut self, rule_text: &str) {
        self.rules.push(rule_text.to_string());
    }

    /// Append the style block as the head's last child. A document without a
    /// reachable head gets nothing; that is a policy no-op, not an error.
    pub fn emit_into(&self, document: &NodeRef) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let head = match document.select_first("head") {
            Ok(head) => head.as_node().clone(),
            Err(()) => return false,
        };
        let style = new_html_element("style", vec![("type", "text/css".to_string())]);
        let text = format!("\n<![CDATA[\n{}\n]]>\n", self.rules.join("\n"));
        style.append(NodeRef::new_text(text));
        head.append(style);
        true
    }
}

/// A selector is a pseudo selector when `:` is followed by an identifier
/// character (or a second `:` for pseudo-element syntax). A bare `:` with
/// nothing after it is not.
pub(crate) fn is_pseudo_selector(selector: &str) -> bool {
    let bytes = selector.as_bytes();
    bytes.windows(2).any(|pair| {
        pair[0] == b':' && (pair[1].is_ascii_alphabetic() || pair[1] == b':')
    })
}
