//! Fan-in of worker results and construction of the run summary.

use chrono::SecondsFormat;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::config::CatalogConfig;
use crate::types::{Catalog, Flyer, Metadata, Schema};

use super::scheduler::BatchEvent;

/// A file that was listed but produced no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the workers produced, in arrival order.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub flyers: Vec<Flyer>,
    pub skipped: Vec<SkippedFile>,
    /// Number of chunk workers that fed this aggregate
    pub batches: usize,
    /// Most chunk workers that ran at the same time
    pub peak_concurrency: usize,
}

/// Collects worker output and builds the summary document.
#[derive(Debug, Clone)]
pub struct Aggregator {
    catalog: CatalogConfig,
}

impl Aggregator {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self { catalog }
    }

    /// Read until every sender is gone. Order is arrival order.
    pub async fn drain(receiver: &mut mpsc::Receiver<BatchEvent>) -> Aggregate {
        let mut aggregate = Aggregate::default();
        while let Some(event) = receiver.recv().await {
            match event {
                BatchEvent::Entry(flyer) => aggregate.flyers.push(*flyer),
                BatchEvent::Skipped(e) => aggregate.skipped.push(SkippedFile {
                    path: e.path().to_path_buf(),
                    reason: e.to_string(),
                }),
            }
        }
        aggregate
    }

    /// Summary for an aggregate, timestamped now.
    ///
    /// `total_flyers` is the number of entries actually collected, never the
    /// number of files listed.
    pub fn summarize(&self, aggregate: &Aggregate, collection_url: &str) -> Metadata {
        Metadata {
            version: self.catalog.version.clone(),
            last_updated: chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_flyers: aggregate.flyers.len(),
            skipped_files: aggregate.skipped.len(),
            url: collection_url.to_string(),
            schema: Schema {
                format: self.catalog.schema.format.clone(),
                encoding: self.catalog.schema.encoding.clone(),
                filetype: self.catalog.schema.filetype.clone(),
            },
        }
    }

    /// Hand the entries and their summary over as one owned catalog.
    pub fn assemble(&self, aggregate: Aggregate, collection_url: &str) -> Catalog {
        let metadata = self.summarize(&aggregate, collection_url);
        Catalog {
            flyers: aggregate.flyers,
            metadata,
        }
    }
}
