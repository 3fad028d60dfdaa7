//! Export sink: turns a canvas into a file.

use super::{BoxFuture, ServiceError, ServiceResult};
use crate::canvas::CanvasState;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Output formats an export sink may support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Pdf,
    Svg,
    Json,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

/// Export parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output width in pixels; the canvas width when unset.
    pub width: Option<u32>,
    /// Output height in pixels; the canvas height when unset.
    pub height: Option<u32>,
    /// Lossy encoder quality in `0.0..=1.0`.
    pub quality: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            width: None,
            height: None,
            quality: 0.92,
        }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Output dimensions for a canvas of `size`.
    ///
    /// With only one dimension given, the other follows the canvas aspect ratio.
    pub fn output_size(&self, size: Size) -> (u32, u32) {
        let aspect = size.width / size.height;
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, (f64::from(w) / aspect).round().max(1.0) as u32),
            (None, Some(h)) => ((f64::from(h) * aspect).round().max(1.0) as u32, h),
            (None, None) => (size.width.round() as u32, size.height.round() as u32),
        }
    }
}

/// A rendered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Renders a canvas into an exported file.
pub trait ExportSink: Send + Sync {
    fn render(&self, canvas: &CanvasState, options: &ExportOptions) -> BoxFuture<'_, ServiceResult<ExportedFile>>;
}

/// Exports the serialized canvas description. Raster and vector formats are
/// left to renderer-backed sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportSink for JsonExporter {
    fn render(&self, canvas: &CanvasState, options: &ExportOptions) -> BoxFuture<'_, ServiceResult<ExportedFile>> {
        let format = options.format;
        let json = canvas.to_json();
        Box::pin(async move {
            if format != ExportFormat::Json {
                return Err(ServiceError::Unsupported(format!(
                    "JsonExporter cannot produce {}",
                    format.mime_type()
                )));
            }
            let json = json.map_err(|e| ServiceError::Serialization(e.to_string()))?;
            Ok(ExportedFile {
                format,
                bytes: json.into_bytes(),
            })
        })
    }
}
