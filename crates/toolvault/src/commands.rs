//! Command implementations.
//!
//! Every command returns the text to print so the binary stays a thin
//! wrapper and tests can assert on output directly.

use crate::cli::{Command, HistoryCommand, InputArgs, RenderArgs, TemplatesCommand};
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use toolvault_core::{OutputMetadata, OutputType, RenderMode, ToolVaultConfig};
use toolvault_detect::TypeDetector;
use toolvault_render::{
    OutputFormat, OutputRenderer, RenderError, RenderReport, ReportFormatter, TerminalRenderer,
};
use toolvault_store::{ExecutionHistory, FileStore, HistoryEntry, TemplateLibrary};

/// Resolved configuration plus the stores commands work against
pub struct App {
    config: ToolVaultConfig,
    format: OutputFormat,
    store: Arc<FileStore>,
}

impl App {
    pub fn new(config: ToolVaultConfig, format_override: Option<&str>) -> Result<Self> {
        let format = format_override
            .unwrap_or(&config.output_format)
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?;
        let store = Arc::new(FileStore::from_config(&config)?);
        Ok(Self {
            config,
            format,
            store,
        })
    }

    pub fn config(&self) -> &ToolVaultConfig {
        &self.config
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn history(&self) -> ExecutionHistory<FileStore> {
        ExecutionHistory::new(Arc::clone(&self.store), self.config.history_limit)
    }

    fn templates(&self) -> TemplateLibrary<FileStore> {
        TemplateLibrary::new(Arc::clone(&self.store))
    }

    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::Detect(args) => self.detect(args).await,
            Command::Render(args) => self.render(args).await,
            Command::History(cmd) => self.history_command(cmd).await,
            Command::Templates(cmd) => self.templates_command(cmd).await,
        }
    }

    async fn detect(&self, args: InputArgs) -> Result<String> {
        let value = read_input(&args.input).await?;
        let metadata = build_metadata(args.metadata.as_deref(), args.output_type.as_deref())?;

        let detector = TypeDetector::default_rules();
        let (chosen, error) = match detector.try_detect(&value, metadata.as_ref()) {
            Ok(chosen) => (chosen, None),
            Err(e) => {
                log::warn!("Type detection failed, reporting generic: {}", e);
                let error = RenderError::Detection {
                    reason: e.to_string(),
                };
                (OutputType::Generic, Some(error))
            }
        };
        let report = RenderReport::new(chosen, self.config.default_mode)
            .with_candidates(detector.detect_all(&value))
            .with_error(error);

        log::info!("Detected {} for {}", chosen, args.input.display());
        Ok(ReportFormatter::format(&report, self.format))
    }

    async fn render(&self, args: RenderArgs) -> Result<String> {
        let value = read_input(&args.input).await?;
        let metadata = build_metadata(args.metadata.as_deref(), None)?;
        let override_type = args
            .output_type
            .as_deref()
            .map(str::parse::<OutputType>)
            .transpose()?;

        let mode = if args.read_only {
            RenderMode::ReadOnly
        } else {
            self.config.default_mode
        };

        let mut renderer = OutputRenderer::with_cache_capacity(mode, self.config.cache_capacity);
        renderer.load(&value, metadata.as_ref());
        if override_type.is_some() {
            renderer.set_override(override_type)?;
        }

        let mut terminal = TerminalRenderer::new();
        let rendered = renderer.render(&value, metadata.as_ref(), &mut terminal);
        let output_type = renderer.effective_type();

        if self.config.record_history && !args.no_history {
            let parameters = json!({
                "input": args.input.display().to_string(),
                "metadata": metadata.as_ref().map(|m| Value::Object(m.as_map().clone())),
            });
            let entry = HistoryEntry::new(&args.tool, parameters, value, output_type);
            match self.history().record(entry).await {
                Ok(entry) => log::debug!("Recorded history entry {}", entry.id),
                Err(e) => log::warn!("Failed to record history: {}", e),
            }
        }

        let report = RenderReport::new(output_type, mode)
            .with_detected(renderer.detected_type())
            .with_candidates(renderer.candidates().to_vec())
            .with_error(renderer.last_error().cloned())
            .with_rendered(rendered);
        Ok(ReportFormatter::format(&report, self.format))
    }

    async fn history_command(&self, command: HistoryCommand) -> Result<String> {
        let history = self.history();
        match command {
            HistoryCommand::List { bookmarked } => {
                let entries = if bookmarked {
                    history.bookmarked().await?
                } else {
                    history.list().await?
                };
                Ok(match self.format {
                    OutputFormat::Json => ReportFormatter::to_json(&entries),
                    OutputFormat::Human => {
                        if entries.is_empty() {
                            return Ok("No history entries\n".to_string());
                        }
                        entries
                            .iter()
                            .map(|e| {
                                format!(
                                    "{} {} {:<12} {:<8} {}\n",
                                    if e.bookmarked { "*" } else { " " },
                                    e.executed_at.format("%Y-%m-%d %H:%M:%S"),
                                    e.tool_id,
                                    e.output_type.as_str(),
                                    e.id
                                )
                            })
                            .collect()
                    }
                    OutputFormat::Text => entries.iter().map(|e| format!("{}\n", e.id)).collect(),
                })
            }
            HistoryCommand::Bookmark { id } => {
                let entry = history.set_bookmark(&id, true).await?;
                Ok(format!("Bookmarked {}\n", entry.id))
            }
            HistoryCommand::Unbookmark { id } => {
                let entry = history.set_bookmark(&id, false).await?;
                Ok(format!("Removed bookmark from {}\n", entry.id))
            }
            HistoryCommand::Clear => {
                let removed = history.clear().await?;
                Ok(format!("Removed {} history entries\n", removed))
            }
        }
    }

    async fn templates_command(&self, command: TemplatesCommand) -> Result<String> {
        let templates = self.templates();
        match command {
            TemplatesCommand::List => {
                let all = templates.list().await?;
                Ok(match self.format {
                    OutputFormat::Json => ReportFormatter::to_json(&all),
                    _ if all.is_empty() => "No templates\n".to_string(),
                    OutputFormat::Human => all
                        .iter()
                        .map(|t| format!("{} ({}) {}\n", t.name, t.tool_id, t.id))
                        .collect(),
                    OutputFormat::Text => all.iter().map(|t| format!("{}\n", t.id)).collect(),
                })
            }
            TemplatesCommand::Export { file } => {
                let json = templates.export_json().await?;
                tokio::fs::write(&file, json)
                    .await
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                Ok(format!("Exported templates to {}\n", file.display()))
            }
            TemplatesCommand::Import { file } => {
                let json = tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let count = templates.import_json(&json).await?;
                Ok(format!("Imported {} template(s)\n", count))
            }
        }
    }
}

/// Read a value from a file or stdin (`-`). Content that does not parse as
/// JSON becomes a string value.
pub async fn read_input(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    Ok(parse_input(&content))
}

pub fn parse_input(content: &str) -> Value {
    serde_json::from_str(content).unwrap_or_else(|_| {
        log::debug!("Input is not JSON, treating it as text");
        Value::String(content.trim_end_matches(['\r', '\n']).to_string())
    })
}

/// Combine `--metadata` JSON with an explicit `--type`
pub fn build_metadata(
    metadata: Option<&str>,
    output_type: Option<&str>,
) -> Result<Option<OutputMetadata>> {
    let mut meta = match metadata {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw).context("--metadata is not valid JSON")?;
            Some(OutputMetadata::from_value(value)?)
        }
        None => None,
    };
    if let Some(name) = output_type {
        let output_type = name.parse::<OutputType>()?;
        meta = Some(
            meta.unwrap_or_default()
                .with(OutputMetadata::TYPE_KEY, output_type.as_str()),
        );
    }
    Ok(meta)
}
