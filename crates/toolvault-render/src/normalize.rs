//! Per-type normalization: turns a raw value into the shape a renderer
//! consumes, or explains why it cannot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use toolvault_core::{Error, OutputMetadata, OutputType, Result, json_kind};
use toolvault_detect::{detect_language, is_feature, is_feature_collection};

/// Keys whose Feature payload the map renderer unwraps
const WRAPPED_FEATURE_KEYS: [&str; 2] = ["feature", "buffered_geometry"];

fn collection_of(feature: &Value) -> Value {
    json!({"type": "FeatureCollection", "features": [feature]})
}

/// Produce a FeatureCollection for the map renderer.
///
/// Accepts a FeatureCollection (unchanged), a Feature (wrapped), or an object
/// whose `feature`/`buffered_geometry` property holds a Feature (wrapped).
pub fn normalize_geojson(value: &Value) -> Result<Value> {
    if is_feature_collection(value) {
        return Ok(value.clone());
    }
    if is_feature(value) {
        return Ok(collection_of(value));
    }
    if let Some(obj) = value.as_object() {
        for key in WRAPPED_FEATURE_KEYS {
            if let Some(nested) = obj.get(key)
                && is_feature(nested)
            {
                log::debug!("Unwrapped GeoJSON feature from '{}'", key);
                return Ok(collection_of(nested));
            }
        }
    }
    Err(Error::render_error(
        OutputType::Geojson,
        "no valid GeoJSON features found",
    ))
}

/// Rows and columns extracted from an array of objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Union of row keys in first-seen order
    pub columns: Vec<String>,
    /// One cell per column; missing keys are `null`
    pub rows: Vec<Vec<Value>>,
}

impl TableData {
    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| {
                Error::render_error(
                    OutputType::Table,
                    format!("expected a non-empty array, got {}", json_kind(value)),
                )
            })?;

        let mut records: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let record = item.as_object().ok_or_else(|| {
                Error::render_error(
                    OutputType::Table,
                    format!("row {} is {}, not an object", i, json_kind(item)),
                )
            })?;
            records.push(record);
        }

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows: Vec<Vec<Value>> = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Chart flavours the renderers know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Scatter => "scatter",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "doughnut" => Ok(ChartKind::Doughnut),
            "scatter" => Ok(ChartKind::Scatter),
            _ => Err(Error::parse_error(format!("Unknown chart type '{}'", s))),
        }
    }
}

/// One series of chart values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Numbers, or `{x, y}` points for scatter charts
    pub data: Vec<Value>,
}

/// Chart-ready data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Build chart data from a `{labels, datasets}` payload or a flat object
    /// of numbers. A `chartType` hint overrides the inferred kind.
    pub fn from_value(value: &Value, metadata: Option<&OutputMetadata>) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::render_error(
                OutputType::Chart,
                format!("expected an object, got {}", json_kind(value)),
            )
        })?;

        let mut chart = match (obj.get("labels"), obj.get("datasets")) {
            (Some(Value::Array(labels)), Some(Value::Array(datasets))) => {
                Self::from_shaped(labels, datasets)
            }
            _ => Self::from_numeric(obj)?,
        };

        if let Some(hint) = metadata.and_then(OutputMetadata::chart_type) {
            match hint.parse::<ChartKind>() {
                Ok(kind) => chart.kind = kind,
                Err(e) => log::warn!("Ignoring chartType hint: {}", e),
            }
        }

        Ok(chart)
    }

    fn from_shaped(labels: &[Value], datasets: &[Value]) -> Self {
        let labels = labels
            .iter()
            .map(|l| match l {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        let datasets: Vec<ChartDataset> = datasets
            .iter()
            .map(|d| ChartDataset {
                label: d.get("label").and_then(Value::as_str).map(str::to_string),
                data: d
                    .get("data")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        let scatter = datasets.first().is_some_and(|d| {
            !d.data.is_empty()
                && d.data
                    .iter()
                    .all(|p| p.get("x").is_some() && p.get("y").is_some())
        });

        Self {
            kind: if scatter {
                ChartKind::Scatter
            } else {
                ChartKind::Bar
            },
            labels,
            datasets,
        }
    }

    fn from_numeric(obj: &Map<String, Value>) -> Result<Self> {
        if obj.len() < 2 || !obj.values().all(Value::is_number) {
            return Err(Error::render_error(
                OutputType::Chart,
                "expected labels and datasets, or an object of two or more numbers",
            ));
        }
        Ok(Self {
            kind: ChartKind::Pie,
            labels: obj.keys().cloned().collect(),
            datasets: vec![ChartDataset {
                label: None,
                data: obj.values().cloned().collect(),
            }],
        })
    }
}

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum ImageSource {
    /// Inline base64 payload
    DataUrl { mime: String, data: String },
    /// Remote http(s) image
    Url { url: String },
    /// Local or relative path
    Path { path: String },
}

impl ImageSource {
    pub fn from_value(value: &Value) -> Result<Self> {
        let s = value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::render_error(
                    OutputType::Image,
                    format!("expected an image reference string, got {}", json_kind(value)),
                )
            })?;

        if let Some(rest) = s.strip_prefix("data:") {
            let (mime, data) = rest
                .split_once(";base64,")
                .filter(|(mime, _)| mime.starts_with("image/"))
                .ok_or_else(|| {
                    Error::render_error(OutputType::Image, "malformed image data URL")
                })?;
            return Ok(ImageSource::DataUrl {
                mime: mime.to_string(),
                data: data.to_string(),
            });
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(ImageSource::Url { url: s.to_string() });
        }

        if s.contains(char::is_whitespace) {
            return Err(Error::render_error(
                OutputType::Image,
                "value is not an image URL or path",
            ));
        }
        Ok(ImageSource::Path {
            path: s.to_string(),
        })
    }
}

/// Text plus the language used for highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TextContent {
    /// Strings are used as-is; other values are pretty-printed as JSON.
    /// The `language` hint beats inference.
    pub fn from_value(value: &Value, metadata: Option<&OutputMetadata>) -> Self {
        let (text, inferred) = match value {
            Value::String(s) => (s.clone(), detect_language(s).map(|(l, _)| l.to_string())),
            other => (
                serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
                Some("json".to_string()),
            ),
        };
        let language = metadata
            .and_then(OutputMetadata::language)
            .map(str::to_string)
            .or(inferred);
        Self { text, language }
    }
}

/// HTML must arrive as a string
pub fn html_source(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| {
        Error::render_error(
            OutputType::Html,
            format!("expected an HTML string, got {}", json_kind(value)),
        )
    })
}
