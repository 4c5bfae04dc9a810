//! Table detector: non-empty arrays of plain objects.

use super::{Detector, is_primitive};
use serde_json::{Map, Value};
use toolvault_core::{DetectionResult, OutputType};

const OBJECT_ARRAY: f64 = 0.6;
const UNIFORM_KEYS: f64 = 0.3;
const PRIMITIVE_CELL: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct TableDetector;

fn same_keys(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len() && a.keys().all(|k| b.contains_key(k))
}

impl Detector for TableDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Table
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(items) = value.as_array() else {
            return DetectionResult::none(OutputType::Table);
        };
        let rows: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();
        if rows.is_empty() || rows.len() != items.len() {
            return DetectionResult::none(OutputType::Table);
        }

        let first = rows[0];
        let mut confidence = OBJECT_ARRAY;
        if rows.iter().all(|row| same_keys(first, row)) {
            confidence += UNIFORM_KEYS;
        }
        if first.values().any(is_primitive) {
            confidence += PRIMITIVE_CELL;
        }

        let columns: Vec<Value> = first.keys().map(|k| Value::from(k.as_str())).collect();
        DetectionResult::new(OutputType::Table, confidence)
            .with_metadata("rowCount", rows.len())
            .with_metadata("columns", columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uniform_rows() {
        let rows = json!([{"name": "a", "size": 1}, {"size": 2, "name": "b"}]);
        let result = TableDetector.detect(&rows);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.metadata["rowCount"], json!(2));
        assert_eq!(result.metadata["columns"], json!(["name", "size"]));
    }

    #[test]
    fn test_heterogeneous_rows() {
        let rows = json!([{"name": "a"}, {"name": "b", "extra": true}]);
        assert_eq!(TableDetector.detect(&rows).confidence, 0.7);

        // Same count, different membership
        let rows = json!([{"a": 1}, {"b": 2}]);
        assert_eq!(TableDetector.detect(&rows).confidence, 0.7);
    }

    #[test]
    fn test_no_primitive_cells() {
        let rows = json!([{"geom": {"x": 1}}, {"geom": {"x": 2}}]);
        assert_eq!(TableDetector.detect(&rows).confidence, 0.9);
    }

    #[test]
    fn test_rejects_mixed_and_empty() {
        assert_eq!(TableDetector.detect(&json!([])).confidence, 0.0);
        assert_eq!(TableDetector.detect(&json!([{"a": 1}, 2])).confidence, 0.0);
        assert_eq!(TableDetector.detect(&json!([[1, 2], [3, 4]])).confidence, 0.0);
        assert_eq!(TableDetector.detect(&json!([{"a": 1}, null])).confidence, 0.0);
        assert_eq!(TableDetector.detect(&json!({"a": 1})).confidence, 0.0);
    }
}
