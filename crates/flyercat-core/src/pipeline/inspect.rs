//! Image inspection: dimensions, format label, and orientation of one file.

use image::{ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Orientation;

use super::validate::Validator;

/// What the inspector learned about one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Label derived from the file extension, not from the content
    pub format_label: String,
    /// Codec the decoder sniffed from the content
    pub detected_format: ImageFormat,
    pub orientation: Orientation,
}

/// Decodes image headers with a per-file deadline.
#[derive(Debug, Clone)]
pub struct ImageInspector {
    validator: Validator,
    limits: LimitsConfig,
}

impl ImageInspector {
    /// Create a new inspector with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            validator: Validator::new(limits.clone()),
            limits,
        }
    }

    /// Inspect a file on the blocking pool, bounded by `inspect_timeout_ms`.
    ///
    /// On timeout the blocking read is abandoned, not interrupted; its
    /// result is discarded when it eventually completes. A read that never
    /// completes keeps its blocking thread, and dropping the runtime waits for
    /// it, so callers should end their runtime with
    /// [`tokio::runtime::Runtime::shutdown_timeout`].
    pub async fn inspect(&self, path: &Path) -> PipelineResult<Inspection> {
        let path_owned = path.to_path_buf();
        let validator = self.validator.clone();
        let timeout_duration = Duration::from_millis(self.limits.inspect_timeout_ms);

        let result = timeout(
            timeout_duration,
            tokio::task::spawn_blocking(move || Self::inspect_with(&validator, &path_owned)),
        )
        .await;

        match result {
            Ok(Ok(inspection)) => inspection,
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                timeout_ms: self.limits.inspect_timeout_ms,
            }),
        }
    }

    /// Synchronous inspection without a deadline.
    pub fn inspect_sync(&self, path: &Path) -> PipelineResult<Inspection> {
        Self::inspect_with(&self.validator, path)
    }

    fn inspect_with(validator: &Validator, path: &Path) -> PipelineResult<Inspection> {
        validator.validate(path)?;

        let reader = ImageReader::open(path).map_err(|e| PipelineError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let reader = reader
            .with_guessed_format()
            .map_err(|e| decode_error(path, format!("Cannot detect image format: {}", e)))?;
        let detected_format = reader
            .format()
            .ok_or_else(|| decode_error(path, "Unrecognized image format".to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| decode_error(path, e.to_string()))?;

        let format_label = format_label(path);
        if !label_matches(&format_label, detected_format) {
            tracing::debug!(
                "{:?} is labelled {} but decodes as {:?}",
                path,
                format_label,
                detected_format
            );
        }

        Ok(Inspection {
            width,
            height,
            format_label,
            detected_format,
            orientation: Orientation::from_dimensions(width, height),
        })
    }
}

fn decode_error(path: &Path, message: String) -> PipelineError {
    PipelineError::Decode {
        path: PathBuf::from(path),
        message,
    }
}

/// Upper-case extension of `path`, with "JPG" normalized to "JPEG".
///
/// Files without an extension get an empty label.
pub fn format_label(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    if ext == "JPG" {
        "JPEG".to_string()
    } else {
        ext
    }
}

fn label_matches(label: &str, format: ImageFormat) -> bool {
    format
        .extensions_str()
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(label))
}
