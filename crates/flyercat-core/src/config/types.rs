//! Sub-configuration structs and their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Batch scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of directory entries handed to each worker
    pub batch_size: usize,

    /// Cap on simultaneously running chunk workers.
    /// Unset means one task per chunk with no cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_batches: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_concurrent_batches: None,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Per-file inspection deadline in milliseconds
    pub inspect_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            inspect_timeout_ms: 5000,
        }
    }
}

/// Constant fields stamped onto every entry and summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Design template placeholder
    pub template_id: String,

    /// Locale recorded on each entry
    pub language: String,

    /// Design type
    pub entry_type: String,

    /// Tags attached to every design
    pub tags: Vec<String>,

    /// Unit for resolution values
    pub resolution_unit: String,

    /// Summary document version
    pub version: String,

    /// Self-description of the output documents
    pub schema: SchemaConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            template_id: "template1".to_string(),
            language: "en-US".to_string(),
            entry_type: "image".to_string(),
            tags: vec![String::new()],
            resolution_unit: "px".to_string(),
            version: "1.0".to_string(),
            schema: SchemaConfig::default(),
        }
    }
}

/// Schema descriptor written into the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub format: String,
    pub encoding: String,
    pub filetype: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            format: "JSON".to_string(),
            encoding: "UTF-8".to_string(),
            filetype: "text".to_string(),
        }
    }
}

/// How the catalog and summary are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogLayout {
    /// `flyers.json` plus a sibling `imagesMetadata.json`
    #[default]
    Split,
    /// One document holding both the entries and the summary
    Combined,
}

/// What goes into each entry's `url` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryUrl {
    /// The file's path with forward slashes
    #[default]
    Path,
    /// The collection URL joined with the file name
    Collection,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the artifacts are written to (supports `~`)
    pub dir: PathBuf,

    /// Split or combined documents
    pub layout: CatalogLayout,

    /// Catalog file name for the split layout
    pub catalog_file: String,

    /// Summary file name for the split layout
    pub metadata_file: String,

    /// Document file name for the combined layout
    pub combined_file: String,

    /// Source of each entry's `url`
    pub entry_url: EntryUrl,

    /// Embed the raw file bytes as a base64 data URI on each entry
    pub embed_image_data: bool,

    /// Also print the rendered documents to stdout
    pub echo: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            layout: CatalogLayout::Split,
            catalog_file: "flyers.json".to_string(),
            metadata_file: "imagesMetadata.json".to_string(),
            combined_file: "output.json".to_string(),
            entry_url: EntryUrl::Path,
            embed_image_data: false,
            echo: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
