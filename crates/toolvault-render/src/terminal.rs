//! Plain-text renderers for terminal output

use crate::normalize::{ChartData, ChartKind, ImageSource, TableData, TextContent};
use crate::renderer::{RenderContext, RenderError, RendererSet};
use serde_json::Value;
use std::collections::BTreeSet;

const BAR_WIDTH: usize = 40;
const MAX_CELL_WIDTH: usize = 32;

/// [`RendererSet`] producing terminal-friendly strings
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    /// Rows shown before truncating a table
    pub max_rows: usize,
    /// List alternative types after interactive renders
    pub show_candidates: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            max_rows: 20,
            show_candidates: true,
        }
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    pub fn with_candidates(mut self, show: bool) -> Self {
        self.show_candidates = show;
        self
    }

    fn finish(&self, body: String, ctx: &RenderContext<'_>) -> String {
        let mut output = if ctx.is_overridden() {
            format!("[{}] (detected {})\n{}", ctx.output_type, ctx.detected_type, body)
        } else {
            format!("[{}]\n{}", ctx.output_type, body)
        };
        if !output.ends_with('\n') {
            output.push('\n');
        }
        if self.show_candidates && !ctx.mode.is_read_only() && ctx.candidates.len() > 1 {
            let others: Vec<String> = ctx
                .candidates
                .iter()
                .filter(|c| c.output_type != ctx.output_type)
                .map(|c| format!("{} ({:.2})", c.output_type, c.confidence))
                .collect();
            if !others.is_empty() {
                output.push_str(&format!("also renders as: {}\n", others.join(", ")));
            }
        }
        output
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        text
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Collect every coordinate pair under a geometry
fn collect_positions(coords: &Value, out: &mut Vec<(f64, f64)>) {
    match coords.as_array() {
        Some(items) if items.len() >= 2 && items[0].is_number() && items[1].is_number() => {
            if let (Some(x), Some(y)) = (items[0].as_f64(), items[1].as_f64()) {
                out.push((x, y));
            }
        }
        Some(items) => items.iter().for_each(|item| collect_positions(item, out)),
        None => {}
    }
}

fn numeric(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.get("y").and_then(Value::as_f64))
}

impl RendererSet for TerminalRenderer {
    type Output = String;

    fn generic(&mut self, value: &Value, ctx: &RenderContext<'_>) -> String {
        let body = match value {
            Value::String(s) => s.clone(),
            other => pretty(other),
        };
        self.finish(body, ctx)
    }

    fn error(&mut self, error: &RenderError, ctx: &RenderContext<'_>) -> String {
        let body = format!("error: {}\n{}", error, pretty(ctx.value));
        self.finish(body, ctx)
    }

    fn map(&mut self, collection: &Value, ctx: &RenderContext<'_>) -> String {
        let features = collection
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut kinds = BTreeSet::new();
        let mut positions = Vec::new();
        for feature in features {
            if let Some(geometry) = feature.get("geometry").filter(|g| g.is_object()) {
                if let Some(kind) = geometry.get("type").and_then(Value::as_str) {
                    kinds.insert(kind.to_string());
                }
                if let Some(coords) = geometry.get("coordinates") {
                    collect_positions(coords, &mut positions);
                }
            }
        }

        let mut body = format!("{} feature(s)", features.len());
        if !kinds.is_empty() {
            let kinds: Vec<String> = kinds.into_iter().collect();
            body.push_str(&format!(": {}", kinds.join(", ")));
        }
        body.push('\n');

        if let Some(&(x0, y0)) = positions.first() {
            let (min_x, min_y, max_x, max_y) = positions.iter().fold(
                (x0, y0, x0, y0),
                |(min_x, min_y, max_x, max_y), &(x, y)| {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                },
            );
            body.push_str(&format!(
                "bbox: [{}, {}, {}, {}]\n",
                min_x, min_y, max_x, max_y
            ));
        }
        self.finish(body, ctx)
    }

    fn table(&mut self, table: &TableData, ctx: &RenderContext<'_>) -> String {
        let shown: Vec<Vec<String>> = table
            .rows
            .iter()
            .take(self.max_rows)
            .map(|row| row.iter().map(cell).collect())
            .collect();

        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                shown
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect();

        let header: Vec<String> = table
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, &w)| pad(name, w))
            .collect();
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

        let mut body = format!("{}\n{}\n", header.join(" | ").trim_end(), rule.join("-+-"));
        for row in &shown {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, &w)| pad(c, w))
                .collect();
            body.push_str(line.join(" | ").trim_end());
            body.push('\n');
        }
        if table.row_count() > shown.len() {
            body.push_str(&format!(
                "... {} more row(s)\n",
                table.row_count() - shown.len()
            ));
        }
        self.finish(body, ctx)
    }

    fn chart(&mut self, chart: &ChartData, ctx: &RenderContext<'_>) -> String {
        let mut body = format!("{} chart\n", chart.kind);

        for (index, dataset) in chart.datasets.iter().enumerate() {
            let name = dataset
                .label
                .clone()
                .unwrap_or_else(|| format!("dataset {}", index + 1));
            body.push_str(&format!("{}:\n", name));

            if chart.kind == ChartKind::Scatter {
                for point in &dataset.data {
                    let x = point.get("x").map(cell).unwrap_or_default();
                    let y = point.get("y").map(cell).unwrap_or_else(|| cell(point));
                    body.push_str(&format!("  ({}, {})\n", x, y));
                }
                continue;
            }

            let values: Vec<f64> = dataset.data.iter().map(|v| numeric(v).unwrap_or(0.0)).collect();
            let max = values.iter().cloned().fold(0.0_f64, |a, b| a.max(b.abs()));
            let label_width = chart
                .labels
                .iter()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0);

            for (i, value) in values.iter().enumerate() {
                let label = chart
                    .labels
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", i + 1));
                let len = if max > 0.0 {
                    ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                body.push_str(&format!(
                    "  {} {} {}\n",
                    pad(&label, label_width),
                    "█".repeat(len),
                    value
                ));
            }
        }
        self.finish(body, ctx)
    }

    fn image(&mut self, image: &ImageSource, ctx: &RenderContext<'_>) -> String {
        let body = match image {
            ImageSource::DataUrl { mime, data } => {
                format!("inline {} image ({} base64 chars)", mime, data.len())
            }
            ImageSource::Url { url } => format!("image: {}", url),
            ImageSource::Path { path } => format!("image file: {}", path),
        };
        self.finish(body, ctx)
    }

    fn text(&mut self, text: &TextContent, ctx: &RenderContext<'_>) -> String {
        let body = match &text.language {
            Some(language) => format!("```{}\n{}\n```", language, text.text),
            None => text.text.clone(),
        };
        self.finish(body, ctx)
    }

    fn json(&mut self, value: &Value, ctx: &RenderContext<'_>) -> String {
        self.finish(pretty(value), ctx)
    }

    fn html(&mut self, html: &str, ctx: &RenderContext<'_>) -> String {
        self.finish(html.to_string(), ctx)
    }
}
