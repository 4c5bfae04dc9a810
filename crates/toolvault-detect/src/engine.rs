//! Composite detector: runs every per-type detector and picks a winner.

use crate::detectors::{Detector, default_detectors};
use serde_json::Value;
use toolvault_core::{DetectionResult, OutputMetadata, OutputType, Result};

/// Runs detectors in a fixed order and ranks their verdicts
pub struct TypeDetector {
    detectors: Vec<Box<dyn Detector>>,
}

impl TypeDetector {
    /// Create a detector with no rules (everything is `Generic`)
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Add a detector after the existing ones
    pub fn add_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// The seven built-in detectors in their canonical order
    pub fn default_rules() -> Self {
        default_detectors()
            .into_iter()
            .fold(Self::new(), Self::add_detector)
    }

    /// All matching results, highest confidence first.
    ///
    /// The sort is stable, so equal scores keep detector order.
    pub fn detect_all(&self, value: &Value) -> Vec<DetectionResult> {
        let mut results: Vec<DetectionResult> = self
            .detectors
            .iter()
            .map(|d| d.detect(value))
            .filter(DetectionResult::is_match)
            .collect();
        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    /// Best type for a value, ignoring metadata
    pub fn best_type(&self, value: &Value) -> OutputType {
        self.detect_all(value)
            .first()
            .map_or(OutputType::Generic, |r| r.output_type)
    }

    /// Resolve the output type, honoring an explicit `type` hint.
    ///
    /// Fails only when the hint is present but not a known type.
    pub fn try_detect(&self, value: &Value, metadata: Option<&OutputMetadata>) -> Result<OutputType> {
        if let Some(explicit) = metadata.map(OutputMetadata::output_type).transpose()?.flatten() {
            log::debug!("Output type {} taken from metadata", explicit);
            return Ok(explicit);
        }

        let detected = self.best_type(value);
        log::debug!("Detected output type {}", detected);
        Ok(detected)
    }

    /// Resolve the output type, degrading to `Generic` on error
    pub fn detect(&self, value: &Value, metadata: Option<&OutputMetadata>) -> OutputType {
        self.try_detect(value, metadata).unwrap_or_else(|e| {
            log::warn!("Type detection failed, falling back to generic: {}", e);
            OutputType::Generic
        })
    }
}

impl Default for TypeDetector {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Detect the output type of a value with the built-in rules
pub fn detect_output_type(value: &Value, metadata: Option<&OutputMetadata>) -> OutputType {
    TypeDetector::default_rules().detect(value, metadata)
}

/// Like [`detect_output_type`], but surfaces metadata errors
pub fn try_detect_output_type(
    value: &Value,
    metadata: Option<&OutputMetadata>,
) -> Result<OutputType> {
    TypeDetector::default_rules().try_detect(value, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_detector_is_generic() {
        assert_eq!(TypeDetector::new().best_type(&json!({"a": 1})), OutputType::Generic);
    }

    #[test]
    fn test_added_detector_order_breaks_ties() {
        use crate::detectors::{ChartDetector, JsonDetector};

        // chart and json both score 0.9 here
        let value = json!({
            "labels": ["a"],
            "datasets": [{"data": [1]}],
            "title": "t",
            "count": 1
        });
        let detector = TypeDetector::new()
            .add_detector(Box::new(JsonDetector))
            .add_detector(Box::new(ChartDetector));
        let results = detector.detect_all(&value);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].confidence, results[1].confidence);
        assert_eq!(results[0].output_type, OutputType::Json);
        assert_eq!(TypeDetector::default_rules().best_type(&value), OutputType::Chart);
    }

    #[test]
    fn test_ranking_is_descending() {
        let results = TypeDetector::default_rules().detect_all(&json!([{"a": 1}, {"a": 2}]));
        let types: Vec<OutputType> = results.iter().map(|r| r.output_type).collect();
        assert_eq!(types, vec![OutputType::Table, OutputType::Json]);
        assert!(results[0].confidence >= results[1].confidence);
    }

    #[test]
    fn test_ties_keep_detector_order() {
        // chart: 0.7 + 0.2; json: 0.6 + 0.2 + 0.1
        let value = json!({
            "labels": ["a"],
            "datasets": [{"data": [1]}],
            "title": "t",
            "count": 1
        });
        let results = TypeDetector::default_rules().detect_all(&value);
        assert_eq!(results[0].output_type, OutputType::Chart);
        assert_eq!(results[1].output_type, OutputType::Json);
        assert_eq!(results[0].confidence, results[1].confidence);
    }

    #[test]
    fn test_metadata_errors() {
        let meta = OutputMetadata::new().with("type", "hologram");
        assert!(try_detect_output_type(&json!("x"), Some(&meta)).is_err());
        assert_eq!(detect_output_type(&json!("x"), Some(&meta)), OutputType::Generic);
    }
}
