//! Structural validation of rendered pages: the `<html>`, `<head>` and
//! `<body>` regions must each appear once, nest correctly and not overlap.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::CheckConfig;

static HTML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<html\b[^>]*>.*?</html\s*>").expect("valid html pattern"));
static HEAD_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").expect("valid head pattern"));
static BODY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>.*?</body\s*>").expect("valid body pattern"));

static HTML_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").expect("valid html tag pattern"));
static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").expect("valid head tag pattern"));
static BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").expect("valid body tag pattern"));

/// Any tag that is not a closing tag, comment or doctype.
static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^/!>][^>]*>").expect("valid open tag pattern"));

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// One of the three document regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Html,
    Head,
    Body,
}

impl Region {
    pub fn tag(self) -> &'static str {
        match self {
            Region::Html => "html",
            Region::Head => "head",
            Region::Body => "body",
        }
    }

    fn block(self) -> &'static Regex {
        match self {
            Region::Html => &HTML_BLOCK,
            Region::Head => &HEAD_BLOCK,
            Region::Body => &BODY_BLOCK,
        }
    }

    fn opening(self) -> &'static Regex {
        match self {
            Region::Html => &HTML_OPEN,
            Region::Head => &HEAD_OPEN,
            Region::Body => &BODY_OPEN,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag())
    }
}

/// A single structural defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing(Region),
    Duplicate(Region),
    NotContained(Region),
    NotDirectChild(Region),
    HeadAfterBody,
    HeadInsideBody,
    BodyInsideHead,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing(region) => write!(f, "missing {} block", region),
            Violation::Duplicate(region) => write!(f, "{} block appears more than once", region),
            Violation::NotContained(region) => {
                write!(f, "{} block is not contained within <html> block", region)
            }
            Violation::NotDirectChild(Region::Body) => write!(
                f,
                "<body> block is not a direct child of <html> (other tags found between <head> and <body>)"
            ),
            Violation::NotDirectChild(region) => write!(
                f,
                "{} block is not a direct child of <html> (other tags found before it)",
                region
            ),
            Violation::HeadAfterBody => write!(f, "<head> block comes after <body> block"),
            Violation::HeadInsideBody => write!(f, "<head> block is found inside <body> block"),
            Violation::BodyInsideHead => write!(f, "<body> block is found inside <head> block"),
        }
    }
}

/// Rendered markup failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "HTML structure validation failed:\n{}\nActual HTML:\n{excerpt}...",
    join_violations(.violations)
)]
pub struct StructuralViolation {
    pub violations: Vec<Violation>,
    /// Leading characters of the offending markup.
    pub excerpt: String,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate `html`, collecting every violation before failing.
pub fn validate_structure(html: &str, config: &CheckConfig) -> Result<(), StructuralViolation> {
    let violations = find_violations(html);
    if violations.is_empty() {
        debug!("page structure valid");
        return Ok(());
    }
    debug!(violations = violations.len(), "page structure invalid");
    Err(StructuralViolation {
        violations,
        excerpt: excerpt(html, config.excerpt_chars).to_owned(),
    })
}

/// Every structural violation in `html`, in check order.
pub fn find_violations(html: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    let regions = [Region::Html, Region::Head, Region::Body];
    let mut spans: [Option<Range<usize>>; 3] = [None, None, None];
    for (slot, region) in spans.iter_mut().zip(regions) {
        *slot = region.block().find(html).map(|m| m.range());
        if slot.is_none() {
            violations.push(Violation::Missing(region));
        }
    }
    for region in regions {
        if region.opening().find_iter(html).nth(1).is_some() {
            violations.push(Violation::Duplicate(region));
        }
    }

    let [Some(html_span), Some(head), Some(body)] = spans else {
        return violations;
    };

    for (region, span) in [(Region::Head, &head), (Region::Body, &body)] {
        if !(html_span.start < span.start && span.end < html_span.end) {
            violations.push(Violation::NotContained(region));
        }
    }

    if let Some(open) = HTML_OPEN.find(html) {
        if has_open_tag(html, open.end(), head.start) {
            violations.push(Violation::NotDirectChild(Region::Head));
        }
    }
    if has_open_tag(html, head.end, body.start) {
        violations.push(Violation::NotDirectChild(Region::Body));
    }

    if head.start >= body.end {
        violations.push(Violation::HeadAfterBody);
    }
    if body.start < head.start && head.start < body.end {
        violations.push(Violation::HeadInsideBody);
    }
    if head.start < body.start && body.start < head.end {
        violations.push(Violation::BodyInsideHead);
    }

    violations
}

/// Whether `html[from..to]` holds an opening tag that is not self-closing.
/// Empty or inverted ranges hold nothing.
fn has_open_tag(html: &str, from: usize, to: usize) -> bool {
    let Some(between) = html.get(from..to) else {
        return false;
    };
    OPEN_TAG
        .find_iter(between)
        .any(|tag| !tag.as_str().ends_with("/>"))
}

/// The first `chars` characters of `text`.
fn excerpt(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>T</title></head>\n<!-- main -->\n<body><p>Hi</p></body>\n</html>";

    #[test]
    fn valid_document_passes() {
        assert_eq!(find_violations(VALID), vec![]);
        assert!(validate_structure(VALID, &CheckConfig::default()).is_ok());
    }

    #[test]
    fn case_insensitive_and_multiline() {
        let html = "<HTML>\n<Head>\n<meta charset=\"utf-8\"/>\n</HEAD>\n<BODY>\nx\n</body></html>";
        assert_eq!(find_violations(html), vec![]);
    }

    #[test]
    fn header_is_not_head() {
        let html = "<html><header>x</header><body></body></html>";
        assert_eq!(find_violations(html), vec![Violation::Missing(Region::Head)]);
    }

    #[test]
    fn missing_regions_are_all_reported() {
        assert_eq!(
            find_violations("<p>nothing</p>"),
            vec![
                Violation::Missing(Region::Html),
                Violation::Missing(Region::Head),
                Violation::Missing(Region::Body),
            ]
        );
    }

    #[test]
    fn duplicate_body() {
        let html = "<html><head></head><body></body><body></body></html>";
        assert_eq!(find_violations(html), vec![Violation::Duplicate(Region::Body)]);
    }

    #[test]
    fn body_outside_html() {
        let html = "<html><head></head></html><body></body>";
        assert_eq!(
            find_violations(html),
            vec![Violation::NotContained(Region::Body)]
        );
    }

    #[test]
    fn wrapper_between_html_and_head() {
        let html = "<html><div><head></head></div><body></body></html>";
        assert_eq!(
            find_violations(html),
            vec![Violation::NotDirectChild(Region::Head)]
        );
    }

    #[test]
    fn wrapper_between_head_and_body() {
        let html = "<html><head></head><main><body></body></main></html>";
        assert_eq!(
            find_violations(html),
            vec![Violation::NotDirectChild(Region::Body)]
        );
    }

    #[test]
    fn self_closing_and_comments_between_regions_are_allowed() {
        let html = "<html><link rel=\"x\"/><head></head><!-- c --><br/><body></body></html>";
        assert_eq!(find_violations(html), vec![]);
    }

    #[test]
    fn head_inside_body() {
        let html = "<html><body><head></head></body></html>";
        assert_eq!(
            find_violations(html),
            vec![Violation::NotDirectChild(Region::Head), Violation::HeadInsideBody]
        );
    }

    #[test]
    fn body_inside_head() {
        let html = "<html><head><body></body></head></html>";
        assert_eq!(find_violations(html), vec![Violation::BodyInsideHead]);
    }

    #[test]
    fn head_after_body() {
        let html = "<html><body></body><head></head></html>";
        assert_eq!(
            find_violations(html),
            vec![Violation::NotDirectChild(Region::Head), Violation::HeadAfterBody]
        );
    }

    #[test]
    fn error_carries_excerpt() {
        let html = "<p>é".repeat(200);
        let err = validate_structure(&html, &CheckConfig::new().with_excerpt_chars(10)).unwrap_err();
        assert_eq!(err.excerpt, "<p>é<p>é<p");
        assert_eq!(err.violations.len(), 3);
    }

    #[test]
    fn error_message() {
        let err = validate_structure("<html></html>", &CheckConfig::default()).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r"
        HTML structure validation failed:
        missing <head> block
        missing <body> block
        Actual HTML:
        <html></html>...
        ");
    }
}
