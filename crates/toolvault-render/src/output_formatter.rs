//! Output formats for detection and render reports
//!
//! `json` is meant for scripts, `human` for people and `text` for the
//! smallest useful summary.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use toolvault_core::{DetectionResult, OutputType, RenderMode};

use crate::renderer::RenderError;

/// Output format preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Machine-readable JSON
    Json,
    /// Human-readable report (default)
    #[default]
    Human,
    /// Minimal plain text
    Text,
}

impl OutputFormat {
    /// Every format, in the order they are listed to users
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Json,
        OutputFormat::Human,
        OutputFormat::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
            OutputFormat::Text => "text",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(OutputFormat::as_str).collect();
                format!(
                    "Unknown output format '{}'. Valid options: {}",
                    s,
                    names.join(", ")
                )
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of detecting (and optionally rendering) one value
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub output_type: OutputType,
    pub detected_type: OutputType,
    pub mode: RenderMode,
    pub candidates: Vec<DetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RenderError>,
    /// Rendered body, when the value was rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl RenderReport {
    pub fn new(output_type: OutputType, mode: RenderMode) -> Self {
        Self {
            output_type,
            detected_type: output_type,
            mode,
            candidates: Vec::new(),
            error: None,
            rendered: None,
        }
    }

    pub fn with_detected(mut self, detected: OutputType) -> Self {
        self.detected_type = detected;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<DetectionResult>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_error(mut self, error: Option<RenderError>) -> Self {
        self.error = error;
        self
    }

    pub fn with_rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered = Some(rendered.into());
        self
    }
}

/// Formats reports for the chosen [`OutputFormat`]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(report: &RenderReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(report),
            OutputFormat::Human => Self::format_human(report),
            OutputFormat::Text => Self::format_text(report),
        }
    }

    /// Pretty JSON for any serializable value
    pub fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| json!({"error": e.to_string()}).to_string())
    }

    fn format_json(report: &RenderReport) -> String {
        Self::to_json(report)
    }

    fn format_human(report: &RenderReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("Type: {}", report.output_type));
        if report.output_type != report.detected_type {
            output.push_str(&format!(" (detected {})", report.detected_type));
        }
        output.push('\n');
        output.push_str(&format!("Mode: {}\n", report.mode));

        if !report.candidates.is_empty() {
            output.push_str("\nCandidates:\n");
            for (i, candidate) in report.candidates.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {:<8} {:.2}",
                    i + 1,
                    candidate.output_type.as_str(),
                    candidate.confidence
                ));
                if !candidate.metadata.is_empty() {
                    output.push_str(&format!("  {}", Self::summarize(&candidate.metadata)));
                }
                output.push('\n');
            }
        }

        if let Some(error) = &report.error {
            output.push_str(&format!("\nError: {}\n", error));
        }

        if let Some(rendered) = &report.rendered {
            output.push('\n');
            output.push_str(rendered);
            if !rendered.ends_with('\n') {
                output.push('\n');
            }
        }
        output
    }

    fn format_text(report: &RenderReport) -> String {
        match &report.rendered {
            Some(rendered) => rendered.clone(),
            None => format!("{}\n", report.output_type),
        }
    }

    /// One-line `key=value` summary of candidate metadata
    fn summarize(metadata: &serde_json::Map<String, Value>) -> String {
        metadata
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}={}", key, s),
                Value::Array(items) => format!("{}=[{} items]", key, items.len()),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderReport {
        RenderReport::new(OutputType::Json, RenderMode::Interactive)
            .with_detected(OutputType::Table)
            .with_candidates(vec![
                DetectionResult::new(OutputType::Table, 1.0).with_metadata("rowCount", 2),
                DetectionResult::new(OutputType::Json, 0.3),
            ])
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!(" text ".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(
            "yaml".parse::<OutputFormat>().unwrap_err(),
            "Unknown output format 'yaml'. Valid options: json, human, text"
        );
        assert_eq!(OutputFormat::default().to_string(), "human");
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_format_json() {
        let out = ReportFormatter::format(&sample(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["outputType"], "json");
        assert_eq!(parsed["detectedType"], "table");
        assert_eq!(parsed["mode"], "interactive");
        assert_eq!(parsed["candidates"][0]["type"], "table");
        assert!(parsed.get("error").is_none());
    }

    #[test]
    fn test_format_human() {
        let out = ReportFormatter::format(&sample(), OutputFormat::Human);
        assert!(out.starts_with("Type: json (detected table)\n"));
        assert!(out.contains("1. table    1.00  rowCount=2"));
        assert!(out.contains("2. json     0.30"));
    }

    #[test]
    fn test_format_text() {
        assert_eq!(ReportFormatter::format(&sample(), OutputFormat::Text), "json\n");
        let rendered = sample().with_rendered("body\n");
        assert_eq!(ReportFormatter::format(&rendered, OutputFormat::Text), "body\n");
    }
}
