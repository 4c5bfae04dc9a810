//! GeoJSON detector: Feature, FeatureCollection, and GeoJSON wrapped in a
//! named result field.

use super::Detector;
use serde_json::{Map, Value};
use toolvault_core::{DetectionResult, OutputType};

/// Property names probed for embedded GeoJSON, in priority order
pub const NESTED_GEOJSON_KEYS: [&str; 4] = ["feature", "buffered_geometry", "geometry", "result"];

const COLLECTION_BASE: f64 = 0.8;
const COLLECTION_GEOMETRY_BONUS: f64 = 0.2;
const FEATURE: f64 = 0.9;
const NESTED_FEATURE: f64 = 0.8;
const NESTED_COLLECTION: f64 = 0.9;
const SCANNED_FEATURE: f64 = 0.7;
const SCANNED_COLLECTION: f64 = 0.8;

/// A geometry needs a non-empty `type` string and a `coordinates` array
pub fn has_valid_geometry(feature: &Value) -> bool {
    let Some(geometry) = feature.get("geometry").and_then(Value::as_object) else {
        return false;
    };
    let has_type = geometry
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());
    let has_coordinates = geometry.get("coordinates").is_some_and(Value::is_array);
    has_type && has_coordinates
}

/// `{"type": "Feature"}` with a valid geometry
pub fn is_feature(value: &Value) -> bool {
    type_tag(value) == Some("Feature") && has_valid_geometry(value)
}

/// `{"type": "FeatureCollection"}` with a `features` array
pub fn is_feature_collection(value: &Value) -> bool {
    type_tag(value) == Some("FeatureCollection")
        && value.get("features").is_some_and(Value::is_array)
}

fn type_tag(value: &Value) -> Option<&str> {
    value.as_object()?.get("type")?.as_str()
}

fn feature_count(collection: &Value) -> usize {
    collection
        .get("features")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Detects GeoJSON, directly or nested one level deep
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonDetector;

impl GeoJsonDetector {
    fn probe_nested(obj: &Map<String, Value>) -> Option<DetectionResult> {
        let mut best: Option<DetectionResult> = None;

        for key in NESTED_GEOJSON_KEYS {
            let Some(nested) = obj.get(key) else {
                continue;
            };
            let found = if is_feature_collection(nested) {
                DetectionResult::new(OutputType::Geojson, NESTED_COLLECTION)
                    .with_metadata("featureCount", feature_count(nested))
            } else if is_feature(nested) {
                DetectionResult::new(OutputType::Geojson, NESTED_FEATURE)
                    .with_metadata("featureCount", 1)
            } else {
                continue;
            };
            let found = found.with_metadata("nestedKey", key);

            if best
                .as_ref()
                .is_none_or(|b| found.confidence > b.confidence)
            {
                best = Some(found);
            }
        }

        best
    }

    fn scan_properties(obj: &Map<String, Value>) -> Option<DetectionResult> {
        let mut best: Option<DetectionResult> = None;

        for (key, nested) in obj {
            let found = if is_feature_collection(nested) {
                DetectionResult::new(OutputType::Geojson, SCANNED_COLLECTION)
                    .with_metadata("featureCount", feature_count(nested))
            } else if is_feature(nested) {
                DetectionResult::new(OutputType::Geojson, SCANNED_FEATURE)
                    .with_metadata("featureCount", 1)
            } else {
                continue;
            };
            let found = found.with_metadata("nestedKey", key.as_str());

            if best
                .as_ref()
                .is_none_or(|b| found.confidence > b.confidence)
            {
                best = Some(found);
            }
        }

        best
    }
}

impl Detector for GeoJsonDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Geojson
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(obj) = value.as_object() else {
            return DetectionResult::none(OutputType::Geojson);
        };

        if is_feature_collection(value) {
            let features = obj
                .get("features")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut confidence = COLLECTION_BASE;
            if features.iter().any(has_valid_geometry) {
                confidence += COLLECTION_GEOMETRY_BONUS;
            }
            return DetectionResult::new(OutputType::Geojson, confidence)
                .with_metadata("featureCount", features.len());
        }

        if is_feature(value) {
            return DetectionResult::new(OutputType::Geojson, FEATURE)
                .with_metadata("featureCount", 1);
        }

        Self::probe_nested(obj)
            .or_else(|| Self::scan_properties(obj))
            .unwrap_or_else(|| DetectionResult::none(OutputType::Geojson))
    }
}
