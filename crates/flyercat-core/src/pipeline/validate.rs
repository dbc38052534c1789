//! Cheap checks run before an image is handed to the decoder.

use image::ImageFormat;
use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Validates files before inspection.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before decoding.
    ///
    /// Checks:
    /// - File exists and can be opened
    /// - File size is within limits
    /// - The decoder can pick a codec, from the content signature or,
    ///   failing that, from the extension
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|e| PipelineError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let metadata = file.metadata().map_err(|e| PipelineError::Open {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let mut header = [0u8; 16];
        let bytes_read = read_prefix(&mut file, &mut header).map_err(|e| PipelineError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if bytes_read < 4 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if !Self::has_known_codec(path, &header[..bytes_read]) {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "Unrecognized image format (no known signature or extension)"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Same selection `ImageReader::with_guessed_format` makes: content
    /// signature first, then the extension for formats without one (TGA).
    fn has_known_codec(path: &Path, header: &[u8]) -> bool {
        image::guess_format(header).is_ok() || ImageFormat::from_path(path).is_ok()
    }
}

/// Fill as much of `buf` as the file provides.
fn read_prefix(file: &mut std::fs::File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
