//! Image detector: data URLs, image URLs and image file paths.

use super::Detector;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use toolvault_core::{DetectionResult, OutputType};

/// File extensions recognized as images
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff",
];

const DATA_URL: f64 = 0.95;
const IMAGE_URL: f64 = 0.9;
const IMAGE_PATH: f64 = 0.8;

/// `data:image/<subtype>;base64,`
static DATA_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/([a-zA-Z0-9.+-]+);base64,").unwrap());

/// Absolute http(s) URL ending in an image extension, query string allowed
static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^https?://\S+\.({})(\?\S*)?$",
        IMAGE_EXTENSIONS.join("|")
    ))
    .unwrap()
});

/// Whitespace-free path ending in an image extension
static IMAGE_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^[^\s<>]+\.({})$", IMAGE_EXTENSIONS.join("|"))).unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDetector;

impl Detector for ImageDetector {
    fn output_type(&self) -> OutputType {
        OutputType::Image
    }

    fn detect(&self, value: &Value) -> DetectionResult {
        let Some(s) = value.as_str() else {
            return DetectionResult::none(OutputType::Image);
        };
        let s = s.trim();

        if let Some(caps) = DATA_URL_PATTERN.captures(s) {
            return DetectionResult::new(OutputType::Image, DATA_URL)
                .with_metadata("source", "dataUrl")
                .with_metadata("format", caps[1].to_lowercase());
        }

        if let Some(caps) = IMAGE_URL_PATTERN.captures(s) {
            return DetectionResult::new(OutputType::Image, IMAGE_URL)
                .with_metadata("source", "url")
                .with_metadata("format", caps[1].to_lowercase());
        }

        if let Some(caps) = IMAGE_PATH_PATTERN.captures(s) {
            return DetectionResult::new(OutputType::Image, IMAGE_PATH)
                .with_metadata("source", "path")
                .with_metadata("format", caps[1].to_lowercase());
        }

        DetectionResult::none(OutputType::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_url() {
        let result = ImageDetector.detect(&json!("data:image/png;base64,AAAA"));
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.metadata["format"], json!("png"));

        let result = ImageDetector.detect(&json!("data:image/svg+xml;base64,PHN2Zz4="));
        assert_eq!(result.metadata["format"], json!("svg+xml"));
    }

    #[test]
    fn test_image_url() {
        let result = ImageDetector.detect(&json!("https://example.com/tiles/map.PNG"));
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.metadata["format"], json!("png"));

        let result = ImageDetector.detect(&json!("http://cdn.test/a.jpg?size=large"));
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_image_path() {
        assert_eq!(ImageDetector.detect(&json!("output/chart.svg")).confidence, 0.8);
        assert_eq!(ImageDetector.detect(&json!("C:\\plots\\a.jpeg")).confidence, 0.8);
    }

    #[test]
    fn test_non_images() {
        for value in [
            json!("https://example.com/report.pdf"),
            json!("see image.png for details"),
            json!("data:text/plain;base64,AAAA"),
            json!(42),
            json!({"src": "a.png"}),
        ] {
            assert_eq!(ImageDetector.detect(&value).confidence, 0.0, "{}", value);
        }
    }
}
