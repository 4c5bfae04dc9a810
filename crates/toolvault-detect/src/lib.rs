//! # ToolVault Detect
//!
//! Decides how a tool result should be presented. Seven independent
//! detectors each score the value for one [`OutputType`]:
//!
//! | order | detector | applies to |
//! |---|---|---|
//! | 1 | [`GeoJsonDetector`] | Feature / FeatureCollection, also nested one level |
//! | 2 | [`TableDetector`] | non-empty arrays of objects |
//! | 3 | [`ChartDetector`] | `{labels, datasets}` or flat numeric objects |
//! | 4 | [`ImageDetector`] | data URLs, image URLs and paths |
//! | 5 | [`HtmlDetector`] | markup strings |
//! | 6 | [`TextDetector`] | any string, boosted for source code |
//! | 7 | [`JsonDetector`] | objects and (penalized) arrays |
//!
//! The highest score wins; equal scores go to the earlier detector, and a
//! value nothing recognizes is [`OutputType::Generic`]. An explicit `type`
//! in the metadata bypasses detection entirely.
//!
//! The scores are additive constants, not probabilities. Small changes to
//! them move the boundaries between `chart` and `json` or `table` and
//! `geojson`.
//!
//! ## Quick Start
//!
//! ```
//! use toolvault_detect::detect_output_type;
//! use toolvault_core::{OutputMetadata, OutputType};
//! use serde_json::json;
//!
//! let rows = json!([{"id": 1, "name": "buffer"}, {"id": 2, "name": "hash"}]);
//! assert_eq!(detect_output_type(&rows, None), OutputType::Table);
//!
//! let meta = OutputMetadata::with_type(OutputType::Text);
//! assert_eq!(detect_output_type(&rows, Some(&meta)), OutputType::Text);
//! ```

pub mod cache;
pub mod detectors;
pub mod engine;

pub use cache::{DetectionCache, cache_key};
pub use detectors::{
    ChartDetector, Detector, GeoJsonDetector, HtmlDetector, ImageDetector, JsonDetector,
    TableDetector, TextDetector, detect_language, has_valid_geometry, is_feature,
    is_feature_collection,
};
pub use engine::{TypeDetector, detect_output_type, try_detect_output_type};
pub use toolvault_core::{DetectionResult, OutputMetadata, OutputType};
