//! Chart detector: pre-shaped `{labels, datasets}` payloads and flat numeric
//! summaries that convert to a pie chart.

use super::Detector;
use serde_json::{Map, Value};
use toolvault_core::{DetectionResult, OutputType};

const SHAPED: f64 = 0.7;
const DATASETS_FILLED: f64 = 0.2;
const XY_POINTS: f64 = 0.1;
const NUMERIC_SUMMARY: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartDetector;

fn is_xy_point(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|p| p.contains_key("x") && p.contains_key("y"))
}

fn dataset_data(dataset: &Value) -> Option<&Vec<Value>> {
    dataset.get("data").and_then(Value::as_array)
}

fn detect_shaped(obj: &Map<String, Value>) -> Option<DetectionResult> {
    let labels = obj.get("labels")?.as_array()?;
    if !labels.iter().all(Value::is_string) {
        return None;
    }
    let datasets = obj.get("datasets")?.as_array()?;

    let mut confidence = SHAPED;
    if datasets
        .iter()
        .all(|d| dataset_data(d).is_some_and(|data| !data.is_empty()))
    {
        confidence += DATASETS_FILLED;
    }

    let scatter = datasets
        .first()
        .and_then(dataset_data)
        .is_some_and(|data| !data.is_empty() && data.iter().all(is_xy_point));
    let chart_type = if scatter {
        confidence += XY_POINTS;
        "scatter"
    } else {
        "bar"
    };

    Some(
        DetectionResult::new(OutputType::Chart, confidence)
            .with_metadata("chartType", chart_type)
            .with_metadata("datasetCount", datasets.len()),
    )
}

fn detect_numeric_summary(obj: &Map<String, Value>) -> Option<DetectionResult> {
    if obj.len() < 2 || !obj.values().all(Value::is_number) {
        return None;
    }
    Some(
        DetectionResult::new(OutputType::Chart, NUMERIC_SUMMARY)
            .with_metadata("chartType", "pie")
            .with_metadata("convertible", true),
    )
}

impl Detector for ChartDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Chart
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(obj) = value.as_object() else {
            return DetectionResult::none(OutputType::Chart);
        };

        detect_shaped(obj)
            .or_else(|| detect_numeric_summary(obj))
            .unwrap_or_else(|| DetectionResult::none(OutputType::Chart))
    }
}
