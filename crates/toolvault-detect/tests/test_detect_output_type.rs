//! End-to-end classification scenarios for detect_output_type

use serde_json::{Value, json};
use toolvault_detect::{OutputMetadata, OutputType, TypeDetector, detect_output_type};

fn point_feature(lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": {"name": "site"}
    })
}

#[test]
fn test_feature_collection_is_geojson() {
    let fc = json!({
        "type": "FeatureCollection",
        "features": [point_feature(-1.5, 50.7), {"type": "Feature", "geometry": null}]
    });
    assert_eq!(detect_output_type(&fc, None), OutputType::Geojson);
}

#[test]
fn test_uniform_object_array_is_table() {
    let rows = json!([
        {"tool": "word-count", "runs": 12, "ok": true},
        {"tool": "sha256", "runs": 3, "ok": false},
        {"tool": "buffer", "runs": 7, "ok": true}
    ]);
    assert_eq!(detect_output_type(&rows, None), OutputType::Table);
}

#[test]
fn test_array_of_features_is_table() {
    // A bare array is never GeoJSON; features share a key set
    let rows = json!([point_feature(0.0, 0.0), point_feature(1.0, 1.0)]);
    assert_eq!(detect_output_type(&rows, None), OutputType::Table);
}

#[test]
fn test_wrapped_geojson_wins_tie_with_json() {
    // Both score 0.8; geojson is evaluated first
    let result = json!({"buffered_geometry": point_feature(0.0, 0.0), "radius_m": 250});
    assert_eq!(detect_output_type(&result, None), OutputType::Geojson);
}

#[test]
fn test_shaped_chart() {
    let chart = json!({"labels": ["a", "b"], "datasets": [{"data": [1, 2]}]});
    assert_eq!(detect_output_type(&chart, None), OutputType::Chart);
}

#[test]
fn test_data_url_is_image() {
    assert_eq!(
        detect_output_type(&json!("data:image/png;base64,AAAA"), None),
        OutputType::Image
    );
}

#[test]
fn test_html_document() {
    assert_eq!(
        detect_output_type(&json!("<html><body><p>hi</p></body></html>"), None),
        OutputType::Html
    );
}

#[test]
fn test_small_numeric_object_is_json_not_chart() {
    // json scores 0.6, the pie conversion only 0.5
    let value = json!({"a": 1, "b": 2, "c": 3});
    assert_eq!(detect_output_type(&value, None), OutputType::Json);

    let results = TypeDetector::default_rules().detect_all(&value);
    assert_eq!(results[0].output_type, OutputType::Json);
    assert_eq!(results[0].confidence, 0.6);
    assert_eq!(results[1].output_type, OutputType::Chart);
    assert_eq!(results[1].confidence, 0.5);
}

#[test]
fn test_explicit_type_wins() {
    let fc = json!({"type": "FeatureCollection", "features": [point_feature(0.0, 0.0)]});
    let meta = OutputMetadata::with_type(OutputType::Text);
    assert_eq!(detect_output_type(&fc, Some(&meta)), OutputType::Text);

    let meta = OutputMetadata::with_type(OutputType::Generic);
    assert_eq!(detect_output_type(&json!("<p>x</p>"), Some(&meta)), OutputType::Generic);
}

#[test]
fn test_metadata_without_type_still_detects() {
    let meta = OutputMetadata::new().with("chartType", "line");
    assert_eq!(
        detect_output_type(&json!("plain words"), Some(&meta)),
        OutputType::Text
    );
}

#[test]
fn test_null_and_scalars_are_generic() {
    assert_eq!(detect_output_type(&Value::Null, None), OutputType::Generic);
    assert_eq!(detect_output_type(&json!(42), None), OutputType::Generic);
    assert_eq!(detect_output_type(&json!(true), None), OutputType::Generic);
}

#[test]
fn test_strings() {
    assert_eq!(detect_output_type(&json!("hello"), None), OutputType::Text);
    assert_eq!(detect_output_type(&json!(""), None), OutputType::Text);
    assert_eq!(
        detect_output_type(&json!("https://tiles.example.org/z/1/2.webp"), None),
        OutputType::Image
    );
    assert_eq!(
        detect_output_type(&json!("SELECT name FROM tools WHERE id = 4"), None),
        OutputType::Text
    );
}

#[test]
fn test_styled_fragment() {
    // html 0.5 + div 0.1 + style 0.2 against text 0.4 + one html pattern
    let fragment = r#"<div style="width: 10px">box</div>"#;
    assert_eq!(detect_output_type(&json!(fragment), None), OutputType::Html);
}

#[test]
fn test_empty_containers() {
    // Empty array: table needs rows; json 0.3 after the array penalty
    assert_eq!(detect_output_type(&json!([]), None), OutputType::Json);
    assert_eq!(detect_output_type(&json!({}), None), OutputType::Json);
}

#[test]
fn test_deeply_nested_value_does_not_panic() {
    let mut value = json!({"leaf": 1});
    for _ in 0..64 {
        value = json!({"inner": value});
    }
    assert_eq!(detect_output_type(&value, None), OutputType::Json);
}
