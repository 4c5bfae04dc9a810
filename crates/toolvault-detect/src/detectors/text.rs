//! Text detector: any string, boosted when it reads like source code.

use super::Detector;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use toolvault_core::{DetectionResult, OutputType};

const ANY_STRING: f64 = 0.4;
const PER_PATTERN: f64 = 0.2;
const LONG_MULTILINE: f64 = 0.1;
const LONG_TEXT_CHARS: usize = 100;

/// Language pattern lists, scanned in priority order; the first language with
/// any hit wins.
static LANGUAGE_PATTERNS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    let table: [(&'static str, &[&str]); 7] = [
        (
            "javascript",
            &[
                r"\b(function|const|let|var)\s+[A-Za-z_$][\w$]*",
                r"=>",
                r"\bconsole\.log\(",
                r"\b(import|export)\s+.*\bfrom\s+['\x22]",
            ],
        ),
        (
            "python",
            &[
                r"\bdef\s+\w+\s*\(",
                r"(?m)^\s*(import\s+\w+|from\s+[\w.]+\s+import\b)",
                r"\bprint\(",
                r"(?m)^\s*(class|if|elif|for|while|with)\b[^\n]*:\s*$",
            ],
        ),
        ("json", &[r"^\s*[\{\[]", r#""[^"\n]*"\s*:"#]),
        ("xml", &[r"<\?xml", r"</?[A-Za-z][\w-]*:[A-Za-z][\w-]*"]),
        (
            "html",
            &[r"(?i)<!DOCTYPE\s+html", r"(?i)</?(div|span|p|body|head)\b"],
        ),
        ("css", &[r"[.#]?[A-Za-z][\w-]*\s*\{[^}]*:[^}]*;", r"@media\b"]),
        (
            "sql",
            &[
                r"(?is)\bSELECT\b.+\bFROM\b",
                r"(?i)\b(INSERT\s+INTO|UPDATE\s+\w+\s+SET|DELETE\s+FROM|CREATE\s+TABLE)\b",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(language, patterns)| {
            let compiled: Vec<Regex> = patterns.iter().map(|p| Regex::new(p).unwrap()).collect();
            (language, compiled)
        })
        .collect()
});

/// First language whose patterns hit, with the number of patterns that hit
pub fn detect_language(text: &str) -> Option<(&'static str, usize)> {
    LANGUAGE_PATTERNS.iter().find_map(|(language, patterns)| {
        let hits = patterns.iter().filter(|p| p.is_match(text)).count();
        (hits > 0).then_some((*language, hits))
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextDetector;

impl Detector for TextDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Text
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(s) = value.as_str() else {
            return DetectionResult::none(OutputType::Text);
        };

        let mut confidence = ANY_STRING;
        let language = detect_language(s);
        if let Some((_, hits)) = language {
            confidence += PER_PATTERN * hits as f64;
        }
        if s.contains('\n') && s.chars().count() > LONG_TEXT_CHARS {
            confidence += LONG_MULTILINE;
        }

        let mut result = DetectionResult::new(OutputType::Text, confidence)
            .with_metadata("lineCount", s.lines().count());
        if let Some((name, _)) = language {
            result = result.with_metadata("language", name);
        }
        result
    }
}
