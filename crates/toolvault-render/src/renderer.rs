//! Output renderer dispatcher.
//!
//! [`OutputRenderer`] resolves the type of a value (user override, else
//! detection), normalizes the value for that type and hands it to the
//! matching callback of a [`RendererSet`]. Failures never escape: detection
//! errors degrade to `generic`, normalization errors go to the set's `error`
//! callback.

use crate::normalize::{
    ChartData, ImageSource, TableData, TextContent, html_source, normalize_geojson,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;
use toolvault_core::{
    DetectionResult, Error, OutputMetadata, OutputType, RenderMode, Result,
};
use toolvault_detect::{DetectionCache, TypeDetector, cache_key};

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Error state shown inline in place of a rendered value
#[derive(ThisError, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderError {
    /// The output type could not be determined
    #[error("Type detection failed: {reason}")]
    Detection { reason: String },

    /// The value does not fit the chosen type
    #[error("Failed to render as {output_type}: {reason}")]
    Normalization {
        output_type: OutputType,
        reason: String,
    },
}

impl RenderError {
    fn normalization(output_type: OutputType, err: Error) -> Self {
        let reason = match err {
            Error::RenderError { reason, .. } => reason,
            other => other.to_string(),
        };
        RenderError::Normalization {
            output_type,
            reason,
        }
    }

    /// Type named by a normalization failure
    pub fn output_type(&self) -> Option<OutputType> {
        match self {
            RenderError::Detection { .. } => None,
            RenderError::Normalization { output_type, .. } => Some(*output_type),
        }
    }
}

/// What a renderer callback knows about the value it is drawing
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The value as received, before normalization
    pub value: &'a Value,
    pub metadata: Option<&'a OutputMetadata>,
    pub mode: RenderMode,
    /// Type being rendered (override or detected)
    pub output_type: OutputType,
    /// Type detection chose
    pub detected_type: OutputType,
    /// Ranked detector results, for an override menu
    pub candidates: &'a [DetectionResult],
}

impl RenderContext<'_> {
    pub fn is_overridden(&self) -> bool {
        self.output_type != self.detected_type
    }
}

/// Per-type rendering callbacks.
///
/// Only `generic` and `error` are required; every other callback falls back
/// to `generic` with the original value.
pub trait RendererSet {
    type Output;

    /// Pretty-print anything
    fn generic(&mut self, value: &Value, ctx: &RenderContext<'_>) -> Self::Output;

    /// Inline error in place of the value
    fn error(&mut self, error: &RenderError, ctx: &RenderContext<'_>) -> Self::Output;

    /// `collection` is always a FeatureCollection
    fn map(&mut self, collection: &Value, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = collection;
        self.generic(ctx.value, ctx)
    }

    fn table(&mut self, table: &TableData, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = table;
        self.generic(ctx.value, ctx)
    }

    fn chart(&mut self, chart: &ChartData, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = chart;
        self.generic(ctx.value, ctx)
    }

    fn image(&mut self, image: &ImageSource, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = image;
        self.generic(ctx.value, ctx)
    }

    fn text(&mut self, text: &TextContent, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = text;
        self.generic(ctx.value, ctx)
    }

    fn json(&mut self, value: &Value, ctx: &RenderContext<'_>) -> Self::Output {
        self.generic(value, ctx)
    }

    fn html(&mut self, html: &str, ctx: &RenderContext<'_>) -> Self::Output {
        let _ = html;
        self.generic(ctx.value, ctx)
    }
}

/// A value normalized for exactly one callback
enum Prepared<'v> {
    Map(Value),
    Table(TableData),
    Chart(ChartData),
    Image(ImageSource),
    Text(TextContent),
    Json,
    Html(&'v str),
    Generic,
}

fn prepare<'v>(
    output_type: OutputType,
    value: &'v Value,
    metadata: Option<&OutputMetadata>,
) -> Result<Prepared<'v>> {
    Ok(match output_type {
        OutputType::Geojson => Prepared::Map(normalize_geojson(value)?),
        OutputType::Table => Prepared::Table(TableData::from_value(value)?),
        OutputType::Chart => Prepared::Chart(ChartData::from_value(value, metadata)?),
        OutputType::Image => Prepared::Image(ImageSource::from_value(value)?),
        OutputType::Text => Prepared::Text(TextContent::from_value(value, metadata)),
        OutputType::Json => Prepared::Json,
        OutputType::Html => Prepared::Html(html_source(value)?),
        OutputType::Generic => Prepared::Generic,
    })
}

/// Stateful dispatcher for one output slot
pub struct OutputRenderer {
    mode: RenderMode,
    detector: TypeDetector,
    cache: DetectionCache,
    last_key: Option<String>,
    detected: OutputType,
    override_type: Option<OutputType>,
    detection_error: Option<RenderError>,
    render_error: Option<RenderError>,
    candidates: Vec<DetectionResult>,
}

impl OutputRenderer {
    /// Create a renderer with the built-in detectors
    pub fn new(mode: RenderMode) -> Self {
        Self::with_cache_capacity(mode, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a renderer with a bounded detection cache
    pub fn with_cache_capacity(mode: RenderMode, capacity: usize) -> Self {
        Self {
            mode,
            detector: TypeDetector::default_rules(),
            cache: DetectionCache::new(capacity),
            last_key: None,
            detected: OutputType::Generic,
            override_type: None,
            detection_error: None,
            render_error: None,
            candidates: Vec::new(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Type chosen by detection for the last value
    pub fn detected_type(&self) -> OutputType {
        self.detected
    }

    pub fn override_type(&self) -> Option<OutputType> {
        self.override_type
    }

    /// Type the next render of the same value will use
    pub fn effective_type(&self) -> OutputType {
        self.override_type.unwrap_or(self.detected)
    }

    /// Most recent error: a render failure, else a detection failure
    pub fn last_error(&self) -> Option<&RenderError> {
        self.render_error.as_ref().or(self.detection_error.as_ref())
    }

    /// Ranked detector results for the last value
    pub fn candidates(&self) -> &[DetectionResult] {
        &self.candidates
    }

    /// Force (or clear) the output type. Rejected in read-only mode.
    pub fn set_override(&mut self, output_type: Option<OutputType>) -> Result<()> {
        if self.mode.is_read_only() {
            return Err(Error::read_only("output type cannot be changed"));
        }
        log::debug!("Output type override set to {:?}", output_type);
        self.override_type = output_type;
        Ok(())
    }

    /// Run detection for a value without rendering it. An override set
    /// afterwards sticks for the next render of the same value.
    pub fn load(&mut self, value: &Value, metadata: Option<&OutputMetadata>) -> OutputType {
        self.refresh(value, metadata);
        self.detected
    }

    /// Re-run detection when the value or metadata differs from last time
    fn refresh(&mut self, value: &Value, metadata: Option<&OutputMetadata>) {
        let key = match cache_key(value, metadata) {
            Ok(key) => key,
            Err(e) => {
                self.last_key = None;
                self.reset_for_new_value();
                self.record_detection_failure(e);
                return;
            }
        };
        if self.last_key.as_deref() == Some(key.as_str()) {
            return;
        }

        self.last_key = Some(key);
        self.reset_for_new_value();

        match self.cache.detect(&self.detector, value, metadata) {
            Ok(detected) => {
                self.detected = detected;
                self.candidates = self.detector.detect_all(value);
            }
            Err(e) => self.record_detection_failure(e),
        }
    }

    fn reset_for_new_value(&mut self) {
        self.override_type = None;
        self.detection_error = None;
        self.render_error = None;
        self.candidates.clear();
    }

    fn record_detection_failure(&mut self, err: Error) {
        log::warn!("Type detection failed, rendering as generic: {}", err);
        self.detected = OutputType::Generic;
        self.detection_error = Some(RenderError::Detection {
            reason: err.to_string(),
        });
    }

    /// Render a value through the callback for its type
    pub fn render<R: RendererSet>(
        &mut self,
        value: &Value,
        metadata: Option<&OutputMetadata>,
        renderers: &mut R,
    ) -> R::Output {
        self.refresh(value, metadata);

        let output_type = self.effective_type();
        let prepared = prepare(output_type, value, metadata).map_err(|e| {
            let error = RenderError::normalization(output_type, e);
            log::warn!("{}", error);
            error
        });
        self.render_error = prepared.as_ref().err().cloned();

        let ctx = RenderContext {
            value,
            metadata,
            mode: self.mode,
            output_type,
            detected_type: self.detected,
            candidates: &self.candidates,
        };

        match prepared {
            Ok(Prepared::Map(collection)) => renderers.map(&collection, &ctx),
            Ok(Prepared::Table(table)) => renderers.table(&table, &ctx),
            Ok(Prepared::Chart(chart)) => renderers.chart(&chart, &ctx),
            Ok(Prepared::Image(image)) => renderers.image(&image, &ctx),
            Ok(Prepared::Text(text)) => renderers.text(&text, &ctx),
            Ok(Prepared::Json) => renderers.json(value, &ctx),
            Ok(Prepared::Html(html)) => renderers.html(html, &ctx),
            Ok(Prepared::Generic) => renderers.generic(value, &ctx),
            Err(error) => renderers.error(&error, &ctx),
        }
    }
}
