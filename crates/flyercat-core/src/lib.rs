//! flyercat core - batch image metadata extraction into JSON catalogs.
//!
//! flyercat lists an image folder, inspects every file concurrently in
//! fixed-size chunks, and writes a catalog of entries plus a summary.
//!
//! # Architecture
//!
//! ```text
//! List dir → Chunk → Inspect (per file, concurrent) → Channel → Aggregate → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use flyercat_core::{Config, FlyerCatalog};
//!
//! #[tokio::main]
//! async fn main() -> flyercat_core::Result<()> {
//!     let catalog = FlyerCatalog::new(Config::load()?)?;
//!     let report = catalog
//!         .read_and_forward("./images", "https://cdn.example.com/fliers", 10)
//!         .await?;
//!     println!("{} entries", report.catalog.metadata.total_flyers);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{CatalogLayout, Config, EntryUrl};
pub use error::{CatalogError, ConfigError, PipelineError, PipelineResult, Result};
pub use output::{Artifact, CatalogWriter};
pub use pipeline::{
    Aggregator, BatchScheduler, EntryBuilder, FileDiscovery, ImageInspector, ListedEntry,
    SkippedFile,
};
pub use types::{Catalog, Design, Flyer, FlyerData, Metadata, Orientation, Resolution, Schema};

use std::path::Path;
use std::time::{Duration, Instant};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of a full run.
#[derive(Debug)]
pub struct RunReport {
    /// The aggregated entries and their summary
    pub catalog: Catalog,
    /// Files listed but not catalogued
    pub skipped: Vec<SkippedFile>,
    /// Number of chunk workers used
    pub batches: usize,
    /// Documents written (empty for `build_catalog`)
    pub artifacts: Vec<Artifact>,
    pub elapsed: Duration,
}

/// Catalog builder - the main entry point.
pub struct FlyerCatalog {
    config: Config,
}

impl FlyerCatalog {
    /// Create a new instance, validating the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing flyercat v{}", VERSION);
        Ok(Self { config })
    }

    /// Create a new instance from the default config file.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::load()?)
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List, inspect and aggregate `image_folder` without writing anything.
    ///
    /// Fails only when the folder cannot be listed or `batch_size` is zero.
    /// Per-file failures end up in [`RunReport::skipped`].
    pub async fn build_catalog(
        &self,
        image_folder: impl AsRef<Path>,
        collection_url: &str,
        batch_size: usize,
    ) -> Result<RunReport> {
        if batch_size == 0 {
            return Err(ConfigError::ValidationError("batch size must be > 0".into()).into());
        }
        let start = Instant::now();
        let image_folder = image_folder.as_ref();

        let entries = FileDiscovery::list(image_folder)?;
        tracing::info!(
            "Found {} file(s) in {:?}",
            FileDiscovery::file_count(&entries),
            image_folder
        );

        let scheduler = BatchScheduler::new(
            ImageInspector::new(self.config.limits.clone()),
            EntryBuilder::new(
                self.config.catalog.clone(),
                self.config.output.entry_url,
                self.config.output.embed_image_data,
                collection_url,
            ),
            self.config.batch.max_concurrent_batches,
        );
        let aggregate = scheduler.schedule(entries, batch_size).await;
        let batches = aggregate.batches;
        let skipped = aggregate.skipped.clone();

        let catalog =
            Aggregator::new(self.config.catalog.clone()).assemble(aggregate, collection_url);
        tracing::info!(
            "Catalogued {} image(s), skipped {}, across {} batch(es)",
            catalog.metadata.total_flyers,
            skipped.len(),
            batches
        );

        Ok(RunReport {
            catalog,
            skipped,
            batches,
            artifacts: Vec::new(),
            elapsed: start.elapsed(),
        })
    }

    /// Build the catalog for `image_folder` and persist it.
    ///
    /// Nothing is written when listing or serialization fails.
    pub async fn read_and_forward(
        &self,
        image_folder: impl AsRef<Path>,
        collection_url: &str,
        batch_size: usize,
    ) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = self
            .build_catalog(image_folder, collection_url, batch_size)
            .await?;
        report.artifacts = CatalogWriter::from_config(&self.config).write(&report.catalog)?;
        report.elapsed = start.elapsed();
        Ok(report)
    }
}

/// Build and write a catalog with default settings.
pub async fn read_and_forward(
    image_folder: impl AsRef<Path>,
    collection_url: &str,
    batch_size: usize,
) -> Result<RunReport> {
    FlyerCatalog::new(Config::default())?
        .read_and_forward(image_folder, collection_url, batch_size)
        .await
}
