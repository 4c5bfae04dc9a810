//! # ToolVault Render
//!
//! Turns a tool result into something displayable. [`OutputRenderer`]
//! picks the type (user override, else detection), [`normalize`] reshapes
//! the value for that type and a [`RendererSet`] draws it.
//!
//! ```
//! use serde_json::json;
//! use toolvault_core::RenderMode;
//! use toolvault_render::{OutputRenderer, TerminalRenderer};
//!
//! let mut renderer = OutputRenderer::new(RenderMode::ReadOnly);
//! let out = renderer.render(&json!([{"id": 1}, {"id": 2}]), None, &mut TerminalRenderer::new());
//! assert!(out.starts_with("[table]"));
//! ```

pub mod normalize;
pub mod output_formatter;
pub mod renderer;
pub mod terminal;

pub use normalize::{
    ChartData, ChartDataset, ChartKind, ImageSource, TableData, TextContent, html_source,
    normalize_geojson,
};
pub use output_formatter::{OutputFormat, RenderReport, ReportFormatter};
pub use renderer::{OutputRenderer, RenderContext, RenderError, RendererSet};
pub use terminal::TerminalRenderer;
