//! Response-level driver: find stylesheet links in a rendered page, resolve
//! them through a caller-supplied source, inline the CSS, and drop the
//! links the target browser would choke on.
//!
//! Fetching stays outside this crate: the filter only sees a narrow
//! [`StylesheetSource`] capability, and callers gate it per request with
//! [`CarrierProfile::wants_inline_css`].

use std::fs;
use std::path::PathBuf;

use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

use crate::carrier::CarrierProfile;
use crate::css::Stylesheet;
use crate::debug::DebugLogger;
use crate::error::GalakeiError;
use crate::metrics::ApplyMetrics;
use crate::rewrite::serialize_node;

/// Resolves a `<link href>` reference to CSS text.
///
/// `Ok(None)` skips the link, which is then left in the document; an error
/// aborts the whole run. Closures with the same shape implement this
/// directly.
pub trait StylesheetSource {
    fn fetch(&self, href: &str) -> Result<Option<String>, GalakeiError>;
}

impl<F> StylesheetSource for F
where
    F: Fn(&str) -> Result<Option<String>, GalakeiError>,
{
    fn fetch(&self, href: &str) -> Result<Option<String>, GalakeiError> {
        self(href)
    }
}

/// Strict filesystem source rooted at a directory; hrefs resolve relative
/// to the root and a missing file is an error.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StylesheetSource for FileSource {
    fn fetch(&self, href: &str) -> Result<Option<String>, GalakeiError> {
        let relative = href.trim_start_matches('/');
        let css = fs::read_to_string(self.root.join(relative))?;
        Ok(Some(css))
    }
}

/// Result of one filter run: the rewritten page plus what happened to it.
#[derive(Debug)]
pub struct FilterOutcome {
    pub html: String,
    pub metrics: ApplyMetrics,
    pub stylesheets_inlined: usize,
}

pub struct InlineCssFilter<S> {
    source: S,
}

impl<S: StylesheetSource> InlineCssFilter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Whether this profile's browser needs the filter at all.
    pub fn should_apply(&self, profile: &CarrierProfile) -> bool {
        profile.wants_inline_css()
    }

    pub fn run(&self, html: &str) -> Result<FilterOutcome, GalakeiError> {
        self.run_with_debug(html, None)
    }

    pub fn run_with_debug(
        &self,
        html: &str,
        debug: Option<&DebugLogger>,
    ) -> Result<FilterOutcome, GalakeiError> {
        let document = kuchiki::parse_html().one(html);

        let links: Vec<(NodeRef, String)> = match document.select("link[rel][href]") {
            Ok(found) => found
                .filter(|link| {
                    let attributes = link.attributes.borrow();
                    attributes
                        .get("rel")
                        .map(|rel| rel.to_ascii_lowercase().contains("stylesheet"))
                        .unwrap_or(false)
                })
                .map(|link| {
                    let href = link
                        .attributes
                        .borrow()
                        .get("href")
                        .unwrap_or("")
                        .to_string();
                    (link.as_node().clone(), href)
                })
                .collect(),
            Err(()) => Vec::new(),
        };

        let mut metrics = ApplyMetrics::default();
        let mut stylesheets_inlined = 0;
        for (link, href) in links {
            let Some(css) = self.source.fetch(&href)? else {
                if let Some(logger) = debug {
                    logger.event("stylesheet.skipped", &href);
                }
                continue;
            };
            if let Some(logger) = debug {
                logger.event("stylesheet.inlining", &href);
            }
            let sheet = Stylesheet::parse_with_debug(&css, debug);
            metrics.merge(&sheet.apply_with_debug(&document, debug));
            link.detach();
            stylesheets_inlined += 1;
        }

        Ok(FilterOutcome {
            html: serialize_node(&document),
            metrics,
            stylesheets_inlined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    const PAGE: &str = "<html><head><link rel=\"stylesheet\" href=\"/stylesheets/simple.css\"></head><body><span>color</span></body></html>";

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("galakei_{}_{}_{}", label, std::process::id(), nanos))
    }

    #[test]
    fn inlines_and_removes_the_link() {
        let filter = InlineCssFilter::new(|_href: &str| Ok(Some("span { color: red; }".to_string())));
        let outcome = filter.run(PAGE).expect("filter run");
        assert!(outcome.html.contains("<span style=\"color: red;\">color</span>"));
        assert!(!outcome.html.contains("<link"));
        assert_eq!(outcome.stylesheets_inlined, 1);
        assert_eq!(outcome.metrics.elements_styled, 1);
    }

    #[test]
    fn skipped_stylesheet_leaves_the_link() {
        let filter = InlineCssFilter::new(|_href: &str| Ok(None));
        let outcome = filter.run(PAGE).expect("filter run");
        assert!(outcome.html.contains("<link"));
        assert_eq!(outcome.stylesheets_inlined, 0);
    }

    #[test]
    fn non_stylesheet_links_are_ignored() {
        let page = "<html><head><link rel=\"alternate\" href=\"/feed\"></head><body></body></html>";
        let filter = InlineCssFilter::new(|_href: &str| {
            Err(GalakeiError::Stylesheet("should not be fetched".to_string()))
        });
        let outcome = filter.run(page).expect("filter run");
        assert!(outcome.html.contains("rel=\"alternate\""));
    }

    #[test]
    fn file_source_reads_relative_to_root() {
        let root = unique_temp_dir("file_source");
        fs::create_dir_all(root.join("stylesheets")).expect("create temp dir");
        fs::write(
            root.join("stylesheets/simple.css"),
            "span { color: red; }",
        )
        .expect("write stylesheet");

        let filter = InlineCssFilter::new(FileSource::new(&root));
        let outcome = filter.run(PAGE).expect("filter run");
        assert!(outcome.html.contains("<span style=\"color: red;\">color</span>"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_source_propagates_missing_files() {
        let root = unique_temp_dir("missing");
        fs::create_dir_all(&root).expect("create temp dir");
        let filter = InlineCssFilter::new(FileSource::new(&root));
        let result = filter.run(PAGE);
        assert!(matches!(result, Err(GalakeiError::Io(_))));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn gating_follows_the_carrier_profile() {
        let filter = InlineCssFilter::new(|_href: &str| Ok(None));
        let imode_1 = CarrierProfile::classify("DoCoMo/2.0 SH902i(c100;TB;W24H12)");
        let imode_2 = CarrierProfile::classify("DoCoMo/2.0 P906i(c500;TB;W24H15)");
        let au = CarrierProfile::classify("KDDI-HI31 UP.Browser/6.2.0.5 (GUI) MMP/2.0");
        assert!(filter.should_apply(&imode_1));
        assert!(!filter.should_apply(&imode_2));
        assert!(!filter.should_apply(&au));
    }
}
