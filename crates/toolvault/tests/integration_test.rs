//! End-to-end command runs against a temporary store

use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;
use toolvault::cli::{Command, HistoryCommand, InputArgs, RenderArgs, TemplatesCommand};
use toolvault::{App, ToolVaultConfig};

fn app(temp: &TempDir, format: &str) -> App {
    let config = ToolVaultConfig {
        store_dir: Some(temp.path().join("store")),
        ..ToolVaultConfig::default()
    };
    App::new(config, Some(format)).unwrap()
}

async fn write_input(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    tokio::fs::write(&path, content).await.unwrap();
    path
}

fn render_args(input: PathBuf) -> RenderArgs {
    RenderArgs {
        input,
        output_type: None,
        metadata: None,
        read_only: false,
        no_history: false,
        tool: "buffer".to_string(),
    }
}

#[tokio::test]
async fn test_detect_reports_ranked_candidates() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "rows.json", r#"[{"id": 1, "ok": true}, {"id": 2, "ok": false}]"#).await;

    let out = app(&temp, "json")
        .run(Command::Detect(InputArgs {
            input,
            output_type: None,
            metadata: None,
        }))
        .await
        .unwrap();

    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["outputType"], "table");
    assert_eq!(report["candidates"][0]["type"], "table");
    assert_eq!(report["candidates"][0]["confidence"], json!(1.0));
}

#[tokio::test]
async fn test_detect_plain_text_input() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "out.txt", "def run():\n    print(1)\n").await;

    let out = app(&temp, "text")
        .run(Command::Detect(InputArgs {
            input,
            output_type: None,
            metadata: None,
        }))
        .await
        .unwrap();
    assert_eq!(out, "text\n");
}

#[tokio::test]
async fn test_detect_with_explicit_type() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "rows.json", r#"[{"id": 1}]"#).await;

    let out = app(&temp, "text")
        .run(Command::Detect(InputArgs {
            input,
            output_type: Some("json".to_string()),
            metadata: None,
        }))
        .await
        .unwrap();
    assert_eq!(out, "json\n");
}

#[tokio::test]
async fn test_detect_bad_type_hint_degrades_to_generic() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "rows.json", r#"[{"id": 1}]"#).await;
    let args = || InputArgs {
        input: input.clone(),
        output_type: None,
        metadata: Some(r#"{"type": "spreadsheet"}"#.to_string()),
    };

    let out = app(&temp, "text").run(Command::Detect(args())).await.unwrap();
    assert_eq!(out, "generic\n");

    let out = app(&temp, "json").run(Command::Detect(args())).await.unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["outputType"], "generic");
    assert_eq!(report["error"]["kind"], "detection");
    assert!(
        report["error"]["reason"]
            .as_str()
            .unwrap()
            .contains("spreadsheet")
    );
}

#[tokio::test]
async fn test_render_records_history() {
    let temp = TempDir::new().unwrap();
    let input = write_input(
        &temp,
        "fc.json",
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [2.35, 48.85]}}
        ]}"#,
    )
    .await;
    let app = app(&temp, "text");

    let out = app.run(Command::Render(render_args(input))).await.unwrap();
    assert!(out.starts_with("[geojson]\n1 feature(s): Point"));

    let ids = app
        .run(Command::History(HistoryCommand::List { bookmarked: false }))
        .await
        .unwrap();
    let id = ids.lines().next().unwrap().to_string();

    let out = app
        .run(Command::History(HistoryCommand::Bookmark { id: id.clone() }))
        .await
        .unwrap();
    assert_eq!(out, format!("Bookmarked {}\n", id));

    let marked = app
        .run(Command::History(HistoryCommand::List { bookmarked: true }))
        .await
        .unwrap();
    assert_eq!(marked, format!("{}\n", id));

    let out = app
        .run(Command::History(HistoryCommand::Clear))
        .await
        .unwrap();
    assert_eq!(out, "Removed 1 history entries\n");
}

#[tokio::test]
async fn test_render_override_and_no_history() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "rows.json", r#"[{"a": 1}, {"a": 2}]"#).await;
    let app = app(&temp, "json");

    let mut args = render_args(input);
    args.output_type = Some("json".to_string());
    args.no_history = true;

    let out = app.run(Command::Render(args)).await.unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["outputType"], "json");
    assert_eq!(report["detectedType"], "table");
    assert!(report["rendered"].as_str().unwrap().starts_with("[json]"));

    let listed = app
        .run(Command::History(HistoryCommand::List { bookmarked: false }))
        .await
        .unwrap();
    assert_eq!(listed, "[]");
}

#[tokio::test]
async fn test_read_only_render_rejects_override() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "rows.json", r#"[{"a": 1}]"#).await;

    let mut args = render_args(input);
    args.output_type = Some("json".to_string());
    args.read_only = true;

    let err = app(&temp, "human")
        .run(Command::Render(args))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("read-only"));
}

#[tokio::test]
async fn test_render_reports_normalization_error() {
    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "word.json", r#""just a word""#).await;

    let mut args = render_args(input);
    args.output_type = Some("table".to_string());

    let out = app(&temp, "human")
        .run(Command::Render(args))
        .await
        .unwrap();
    assert!(out.starts_with("Type: table (detected text)\n"));
    assert!(out.contains("Error: Failed to render as table"));
}

#[tokio::test]
async fn test_templates_export_import() {
    let temp = TempDir::new().unwrap();
    let export = temp.path().join("templates.json");
    tokio::fs::write(
        &export,
        r#"[{"id": "t-1", "name": "Buffer 1km", "toolId": "buffer",
             "parameters": {"radius": 1000}, "createdAt": "2026-01-05T10:00:00Z"}]"#,
    )
    .await
    .unwrap();

    let app = app(&temp, "human");
    let out = app
        .run(Command::Templates(TemplatesCommand::Import { file: export.clone() }))
        .await
        .unwrap();
    assert_eq!(out, "Imported 1 template(s)\n");

    let listed = app
        .run(Command::Templates(TemplatesCommand::List))
        .await
        .unwrap();
    assert_eq!(listed, "Buffer 1km (buffer) t-1\n");

    let target = temp.path().join("roundtrip.json");
    app.run(Command::Templates(TemplatesCommand::Export { file: target.clone() }))
        .await
        .unwrap();
    let exported: Value =
        serde_json::from_str(&tokio::fs::read_to_string(&target).await.unwrap()).unwrap();
    assert_eq!(exported[0]["parameters"], json!({"radius": 1000}));
}

#[tokio::test]
async fn test_unknown_output_format_rejected() {
    let temp = TempDir::new().unwrap();
    let config = ToolVaultConfig {
        store_dir: Some(temp.path().to_path_buf()),
        ..ToolVaultConfig::default()
    };
    assert!(App::new(config, Some("yaml")).is_err());
}
