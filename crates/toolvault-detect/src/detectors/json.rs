//! JSON tree detector: the fallback for structured objects.
//!
//! Arrays are scored too, at a penalty, so that uniform object arrays go to
//! the table renderer instead.

use super::Detector;
use serde_json::Value;
use std::collections::HashSet;
use toolvault_core::{DetectionResult, OutputType};

const STRUCTURED: f64 = 0.6;
const NESTED: f64 = 0.2;
const MIXED_KINDS: f64 = 0.1;
const ARRAY_PENALTY: f64 = -0.3;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDetector;

/// Category names as a dynamic `typeof` would report them
fn kind_category(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

impl Detector for JsonDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Json
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let children: Vec<&Value> = match value {
            Value::Object(map) => map.values().collect(),
            Value::Array(items) => items.iter().collect(),
            _ => return DetectionResult::none(OutputType::Json),
        };

        let mut confidence = STRUCTURED;
        if children.iter().any(|v| is_nested(v)) {
            confidence += NESTED;
        }
        let kinds: HashSet<&str> = children.iter().map(|v| kind_category(v)).collect();
        if kinds.len() > 2 {
            confidence += MIXED_KINDS;
        }
        if value.is_array() {
            confidence += ARRAY_PENALTY;
        }

        DetectionResult::new(OutputType::Json, confidence)
            .with_metadata("entries", children.len())
    }
}
