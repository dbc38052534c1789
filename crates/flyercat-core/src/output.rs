//! Serialization and persistence of the catalog documents.
//!
//! Two layouts share the same in-memory [`Catalog`]:
//! - **split**: `flyers.json` (2-space indent) and `imagesMetadata.json`
//!   (1-space indent)
//! - **combined**: one document holding both, 2-space indent
//!
//! Every buffer is rendered before anything touches disk, and each file is
//! written to a sibling temp file and renamed into place.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

use crate::config::{CatalogLayout, Config};
use crate::error::CatalogError;
use crate::types::{Catalog, CombinedDocument, FlyersDocument};

/// A rendered document and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Artifact {
    /// Contents as text (always valid UTF-8, since serde_json produced it).
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.contents).unwrap_or_default()
    }
}

/// Renders and persists a catalog in the configured layout.
#[derive(Debug, Clone)]
pub struct CatalogWriter {
    layout: CatalogLayout,
    dir: PathBuf,
    catalog_file: String,
    metadata_file: String,
    combined_file: String,
}

impl CatalogWriter {
    /// Build a writer from the output section of the config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            layout: config.output.layout,
            dir: config.output_dir(),
            catalog_file: config.output.catalog_file.clone(),
            metadata_file: config.output.metadata_file.clone(),
            combined_file: config.output.combined_file.clone(),
        }
    }

    pub fn layout(&self) -> CatalogLayout {
        self.layout
    }

    /// Serialize the catalog without writing anything.
    pub fn render(&self, catalog: &Catalog) -> Result<Vec<Artifact>, CatalogError> {
        match self.layout {
            CatalogLayout::Split => {
                let flyers = FlyersDocument {
                    flyers: catalog.flyers.clone(),
                };
                Ok(vec![
                    Artifact {
                        path: self.dir.join(&self.catalog_file),
                        contents: to_json_indented(&flyers, b"  ")?,
                    },
                    Artifact {
                        path: self.dir.join(&self.metadata_file),
                        contents: to_json_indented(&catalog.metadata, b" ")?,
                    },
                ])
            }
            CatalogLayout::Combined => {
                let document = CombinedDocument {
                    flyers: catalog.flyers.clone(),
                    metadata: catalog.metadata.clone(),
                };
                Ok(vec![Artifact {
                    path: self.dir.join(&self.combined_file),
                    contents: to_json_indented(&document, b"  ")?,
                }])
            }
        }
    }

    /// Render every document, then persist them one by one.
    ///
    /// Returns the artifacts that were written.
    pub fn write(&self, catalog: &Catalog) -> Result<Vec<Artifact>, CatalogError> {
        let artifacts = self.render(catalog)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| CatalogError::Write {
            path: self.dir.clone(),
            source,
        })?;

        for artifact in &artifacts {
            persist(artifact)?;
            tracing::info!("Wrote {:?} ({} bytes)", artifact.path, artifact.contents.len());
        }
        Ok(artifacts)
    }
}

/// Pretty-print `value` with a custom indent string.
pub fn to_json_indented<T: Serialize>(value: &T, indent: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write the whole buffer to a temp sibling, then rename it over the target.
fn persist(artifact: &Artifact) -> Result<(), CatalogError> {
    let tmp = temp_path(&artifact.path);
    let result = std::fs::write(&tmp, &artifact.contents)
        .and_then(|()| std::fs::rename(&tmp, &artifact.path));

    if let Err(source) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(CatalogError::Write {
            path: artifact.path.clone(),
            source,
        });
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
