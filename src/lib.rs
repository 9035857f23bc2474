//! galakei rewrites CSS into per-element inline presentation attributes for
//! browsers that cannot apply a stylesheet at all — the i-mode 1.0
//! generation of Japanese feature phones: no `<style>` support, no
//! inheritance, a box model too limited for borders.
//!
//! The engine walks a stylesheet once, in source order, and applies each
//! rule to its current matches. Properties the target renderer can express
//! inline are appended to the element's `style` attribute; the rest
//! restructure the tree: `color`/`font-size` on block elements wrap the
//! children in a styled `<span>`, `background-color` on headings and
//! paragraphs wraps the element in a styled `<div>`, and borders become
//! fixed-height spacer images served from `/galakei/spacer/{color}`.
//! Pseudo-class rules, which cannot be resolved at transform time, are
//! re-emitted verbatim as a single CDATA-guarded `<style>` block in the
//! head.
//!
//! ```
//! use galakei::inline_css;
//!
//! let html = inline_css("<span>foo</span>", "span { color: red; }");
//! assert!(html.contains("<span style=\"color: red;\">foo</span>"));
//! ```

mod border;
mod carrier;
mod css;
mod debug;
mod error;
mod filter;
mod inline;
mod metrics;
mod pseudo;
mod rewrite;

pub use carrier::CarrierProfile;
pub use css::{Declaration, Rule, Stylesheet};
pub use debug::DebugLogger;
pub use error::GalakeiError;
pub use filter::{FileSource, FilterOutcome, InlineCssFilter, StylesheetSource};
pub use metrics::ApplyMetrics;
pub use rewrite::spacer_url;

use kuchiki::traits::TendrilSink;

/// Parse `html`, apply `css`, and serialize the rewritten document.
///
/// Convenience wrapper over [`Stylesheet::parse`] and [`Stylesheet::apply`];
/// use those directly to reuse one stylesheet across documents or to keep
/// the mutated tree.
pub fn inline_css(html: &str, css: &str) -> String {
    let document = kuchiki::parse_html().one(html);
    Stylesheet::parse(css).apply(&document);
    let mut out = Vec::new();
    let _ = document.serialize(&mut out);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn end_to_end_inline() {
        let html = inline_css("<span>foo</span>", "span { color: red; }");
        assert!(html.contains("<span style=\"color: red;\">foo</span>"));
    }

    #[test]
    fn stylesheet_is_reusable_across_documents() {
        let sheet = Stylesheet::parse("h1 { color: red; }");
        for _ in 0..2 {
            let document = kuchiki::parse_html().one("<h1>foo</h1>");
            let metrics = sheet.apply(&document);
            // A fresh pass must create a fresh wrapper every time.
            assert_eq!(metrics.child_wrappers_created, 1);
        }
    }

    #[test]
    fn non_ascii_content_survives() {
        let html = inline_css("<p>ほげ</p>", "span { color: red; }");
        assert!(html.contains("ほげ"));
    }

    #[test]
    fn debug_logger_records_the_pass() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!(
            "galakei_debug_{}_{}.jsonl",
            std::process::id(),
            nanos
        ));
        let logger = DebugLogger::new(&path).expect("debug logger");
        let document = kuchiki::parse_html().one("<a href=\"/\">foo</a>");
        let sheet = Stylesheet::parse_with_debug("a:link { color: red; }", Some(&logger));
        sheet.apply_with_debug(&document, Some(&logger));
        logger.flush();
        let log = std::fs::read_to_string(&path).expect("read debug log");
        assert!(log.contains("\"rule.pseudo\""));
        assert!(log.contains("\"summary\""));
        let _ = std::fs::remove_file(path);
    }
}
