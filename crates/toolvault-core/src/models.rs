//! Core data types shared by detection and rendering.
//!
//! A *candidate value* is any `serde_json::Value` produced by a tool
//! execution. Detection attaches an [`OutputType`] to it; rendering hands the
//! value to the callback for that type.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The closed set of ways a tool result can be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// GeoJSON Feature or FeatureCollection, shown on a map
    Geojson,
    /// Array of uniform objects, shown as rows and columns
    Table,
    /// Labelled datasets or a flat numeric summary
    Chart,
    /// Data URL, image URL or image path
    Image,
    /// Plain text or source code
    Text,
    /// Structured object shown as a tree
    Json,
    /// HTML markup
    Html,
    /// Anything else, pretty-printed
    Generic,
}

impl OutputType {
    /// Every output type, in declaration order
    pub const ALL: [OutputType; 8] = [
        OutputType::Geojson,
        OutputType::Table,
        OutputType::Chart,
        OutputType::Image,
        OutputType::Text,
        OutputType::Json,
        OutputType::Html,
        OutputType::Generic,
    ];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Geojson => "geojson",
            OutputType::Table => "table",
            OutputType::Chart => "chart",
            OutputType::Image => "image",
            OutputType::Text => "text",
            OutputType::Json => "json",
            OutputType::Html => "html",
            OutputType::Generic => "generic",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        OutputType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| Error::unknown_output_type(s))
    }
}

/// Caller-supplied rendering hints (`type`, `chartType`, `language`, ...).
///
/// Key order is preserved so hints round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMetadata(Map<String, Value>);

impl OutputMetadata {
    pub const TYPE_KEY: &'static str = "type";
    pub const CHART_TYPE_KEY: &'static str = "chartType";
    pub const LANGUAGE_KEY: &'static str = "language";

    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from an arbitrary JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::parse_error(format!(
                "Output metadata must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Metadata carrying only an explicit type hint
    pub fn with_type(output_type: OutputType) -> Self {
        Self::new().with(Self::TYPE_KEY, output_type.as_str())
    }

    /// Add a hint
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw hint lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The explicit `type` hint, if any.
    ///
    /// A `null` hint counts as absent; a hint naming an unknown type, or one
    /// that is not a string, is an error.
    pub fn output_type(&self) -> Result<Option<OutputType>> {
        match self.0.get(Self::TYPE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(name)) => name.parse().map(Some),
            Some(other) => Err(Error::unknown_output_type(other.to_string())),
        }
    }

    /// The `chartType` hint, if it is a string
    pub fn chart_type(&self) -> Option<&str> {
        self.0.get(Self::CHART_TYPE_KEY).and_then(Value::as_str)
    }

    /// The `language` hint, if it is a string
    pub fn language(&self) -> Option<&str> {
        self.0.get(Self::LANGUAGE_KEY).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for OutputMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Clamp a raw score to `[0, 1]` and round it to four decimal places.
///
/// Scores are sums of fixed increments. Unrounded, `0.7 + 0.2` comes out
/// just below `0.6 + 0.2 + 0.1`, so ranking on the raw float sum would put
/// the later detector first. Rounding makes the two equal and the tie falls
/// back to detector order.
pub fn clamp_confidence(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

/// One detector's verdict on a candidate value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Type this detector votes for
    #[serde(rename = "type")]
    pub output_type: OutputType,
    /// Heuristic score in `[0, 1]`; not a probability
    pub confidence: f64,
    /// Detector-specific findings (feature counts, columns, language, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl DetectionResult {
    /// Create a result, clamping the confidence
    pub fn new(output_type: OutputType, confidence: f64) -> Self {
        Self {
            output_type,
            confidence: clamp_confidence(confidence),
            metadata: Map::new(),
        }
    }

    /// A zero-confidence result (no match)
    pub fn none(output_type: OutputType) -> Self {
        Self::new(output_type, 0.0)
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this result takes part in ranking
    pub fn is_match(&self) -> bool {
        self.confidence > 0.0
    }
}

/// Whether the user may change how a value is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Type override and other controls are available
    #[default]
    Interactive,
    /// Display only
    ReadOnly,
}

impl RenderMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, RenderMode::ReadOnly)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Interactive => write!(f, "interactive"),
            RenderMode::ReadOnly => write!(f, "read-only"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "interactive" => Ok(RenderMode::Interactive),
            "read-only" | "readonly" | "read_only" => Ok(RenderMode::ReadOnly),
            _ => Err(Error::parse_error(format!(
                "Unknown render mode '{}'. Valid options: interactive, read-only",
                s
            ))),
        }
    }
}

/// Short human name of a JSON value's kind, for messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_type_parse() {
        assert_eq!("geojson".parse::<OutputType>().unwrap(), OutputType::Geojson);
        assert_eq!(" Table ".parse::<OutputType>().unwrap(), OutputType::Table);
        assert!("map".parse::<OutputType>().is_err());

        for t in OutputType::ALL {
            assert_eq!(t.to_string().parse::<OutputType>().unwrap(), t);
        }
    }

    #[test]
    fn test_output_type_serde_names() {
        assert_eq!(serde_json::to_value(OutputType::Html).unwrap(), json!("html"));
        let t: OutputType = serde_json::from_value(json!("generic")).unwrap();
        assert_eq!(t, OutputType::Generic);
    }

    #[test]
    fn test_metadata_type_hint() {
        let meta = OutputMetadata::from_value(json!({"type": "text", "language": "python"}))
            .unwrap();
        assert_eq!(meta.output_type().unwrap(), Some(OutputType::Text));
        assert_eq!(meta.language(), Some("python"));
        assert_eq!(meta.chart_type(), None);

        let meta = OutputMetadata::from_value(json!({"type": null})).unwrap();
        assert_eq!(meta.output_type().unwrap(), None);

        let meta = OutputMetadata::from_value(json!({"type": "hologram"})).unwrap();
        assert!(meta.output_type().is_err());

        let meta = OutputMetadata::from_value(json!({"type": 3})).unwrap();
        assert!(meta.output_type().is_err());
    }

    #[test]
    fn test_metadata_must_be_object() {
        assert!(OutputMetadata::from_value(json!([1, 2])).is_err());
        assert!(OutputMetadata::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_rounding_equalizes_increment_sums() {
        let chart: f64 = 0.7 + 0.2;
        let json: f64 = 0.6 + 0.2 + 0.1;
        assert!(chart < json);
        assert_eq!(clamp_confidence(chart), clamp_confidence(json));
        assert_eq!(clamp_confidence(json), 0.9);
    }

    #[test]
    fn test_confidence_clamping() {
        assert_eq!(clamp_confidence(1.3), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(DetectionResult::new(OutputType::Table, 0.6 + 0.3 + 0.1).confidence, 1.0);
    }

    #[test]
    fn test_render_mode_parse() {
        assert_eq!("read-only".parse::<RenderMode>().unwrap(), RenderMode::ReadOnly);
        assert_eq!("Interactive".parse::<RenderMode>().unwrap(), RenderMode::Interactive);
        assert!("kiosk".parse::<RenderMode>().is_err());
        assert!(RenderMode::ReadOnly.is_read_only());
    }
}
