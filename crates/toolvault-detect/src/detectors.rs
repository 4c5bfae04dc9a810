//! Per-type detectors.
//!
//! Each detector scores one [`OutputType`] independently by adding fixed
//! increments for every structural signal it finds. Detectors are total over
//! `serde_json::Value`: malformed shapes score zero instead of failing.

use serde_json::Value;
use toolvault_core::{DetectionResult, OutputType};

mod chart;
mod geojson;
mod html;
mod image;
mod json;
mod table;
mod text;

pub use self::chart::ChartDetector;
pub use self::geojson::{
    GeoJsonDetector, has_valid_geometry, is_feature, is_feature_collection, NESTED_GEOJSON_KEYS,
};
pub use self::html::HtmlDetector;
pub use self::image::{IMAGE_EXTENSIONS, ImageDetector};
pub use self::json::JsonDetector;
pub use self::table::TableDetector;
pub use self::text::{TextDetector, detect_language};

/// Trait for output type detectors
pub trait Detector: Send + Sync {
    /// The type this detector votes for
    fn output_type(&self) -> OutputType;

    /// Score a candidate value
    fn detect(&self, value: &Value) -> DetectionResult;
}

/// The seven detectors in evaluation order.
///
/// Order matters: ranking is stable, so on equal confidence the earlier
/// detector wins.
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(GeoJsonDetector),
        Box::new(TableDetector),
        Box::new(ChartDetector),
        Box::new(ImageDetector),
        Box::new(HtmlDetector),
        Box::new(TextDetector),
        Box::new(JsonDetector),
    ]
}

/// Whether a value is a primitive in the table sense (string, number, boolean)
pub(crate) fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
