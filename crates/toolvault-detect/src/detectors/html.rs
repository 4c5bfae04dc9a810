//! HTML detector: tag density, document markers and inline styles.

use super::Detector;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use toolvault_core::{DetectionResult, OutputType};

const ANY_TAG: f64 = 0.5;
const COMMON_TAG: f64 = 0.1;
const DOCUMENT_MARKER: f64 = 0.3;
const INLINE_STYLE: f64 = 0.2;
const XML_DECLARATION: f64 = -0.3;

const COMMON_TAGS: [&str; 16] = [
    "div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "em", "a", "img", "table",
    "tr", "td",
];

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").unwrap());

/// One opening pattern per common tag, in `COMMON_TAGS` order
static COMMON_TAG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COMMON_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?i)<{}[\s/>]", tag)).unwrap())
        .collect()
});

static DOCUMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE\s+html|<html[\s>]").unwrap());

static STYLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\sstyle\s*=\s*"[^"]*""#).unwrap());

static XML_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\?xml").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDetector;

impl Detector for HtmlDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Html
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(s) = value.as_str() else {
            return DetectionResult::none(OutputType::Html);
        };

        let mut confidence = 0.0;
        if TAG_PATTERN.is_match(s) {
            confidence += ANY_TAG;
        }

        let common_tags = COMMON_TAG_PATTERNS.iter().filter(|p| p.is_match(s)).count();
        confidence += COMMON_TAG * common_tags as f64;

        let is_document = DOCUMENT_PATTERN.is_match(s);
        if is_document {
            confidence += DOCUMENT_MARKER;
        }
        if STYLE_PATTERN.is_match(s) {
            confidence += INLINE_STYLE;
        }
        if XML_PATTERN.is_match(s) {
            confidence += XML_DECLARATION;
        }

        DetectionResult::new(OutputType::Html, confidence)
            .with_metadata("commonTags", common_tags)
            .with_metadata("isDocument", is_document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document() {
        let result = HtmlDetector.detect(&json!("<html><body><p>hi</p></body></html>"));
        // any tag + <p> + document marker
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.metadata["isDocument"], json!(true));
    }

    #[test]
    fn test_fragment_with_style() {
        let html = r#"<div style="color: red"><span>a</span><a href="/x">b</a></div>"#;
        // 0.5 + div, span, a + style
        assert_eq!(HtmlDetector.detect(&json!(html)).confidence, 1.0);
    }

    #[test]
    fn test_repeated_tag_counts_once() {
        let result = HtmlDetector.detect(&json!("<p>a</p><p>b</p><p>c</p>"));
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.metadata["commonTags"], json!(1));
    }

    #[test]
    fn test_tag_prefixes_do_not_count() {
        let result = HtmlDetector.detect(&json!("<pre>x</pre><abbr>y</abbr>"));
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.metadata["commonTags"], json!(0));
    }

    #[test]
    fn test_xml_is_penalized() {
        let xml = r#"<?xml version="1.0"?><root><item/></root>"#;
        assert_eq!(HtmlDetector.detect(&json!(xml)).confidence, 0.2);
    }

    #[test]
    fn test_plain_text_and_non_strings() {
        assert_eq!(HtmlDetector.detect(&json!("a < b and c > d")).confidence, 0.5);
        assert_eq!(HtmlDetector.detect(&json!("no markup here")).confidence, 0.0);
        assert_eq!(HtmlDetector.detect(&json!(["<p>"])).confidence, 0.0);
    }
}
