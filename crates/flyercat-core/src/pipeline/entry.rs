//! Turns an inspected file into a catalog entry.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::{Component, Path, PathBuf};

use crate::config::{CatalogConfig, EntryUrl};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{Design, Flyer, FlyerData, Resolution};

use super::discovery::ListedEntry;
use super::inspect::Inspection;

/// Stamps configured constants and per-file facts onto a [`Flyer`].
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    catalog: CatalogConfig,
    entry_url: EntryUrl,
    embed_image_data: bool,
    collection_url: String,
}

impl EntryBuilder {
    pub fn new(
        catalog: CatalogConfig,
        entry_url: EntryUrl,
        embed_image_data: bool,
        collection_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            entry_url,
            embed_image_data,
            collection_url: collection_url.into(),
        }
    }

    /// Build the entry for a successfully inspected file.
    ///
    /// Only fails in embed mode, when the file can no longer be read.
    pub fn build(&self, entry: &ListedEntry, inspection: Inspection) -> PipelineResult<Flyer> {
        let data = if self.embed_image_data {
            Some(self.embed(&entry.path, &inspection.format_label)?)
        } else {
            None
        };

        let url = match self.entry_url {
            EntryUrl::Path => to_slash(&clean(&entry.path)),
            EntryUrl::Collection => format!(
                "{}/{}",
                self.collection_url.trim_end_matches('/'),
                entry.file_name
            ),
        };

        Ok(Flyer {
            id: strip_extension(&entry.file_name).to_string(),
            design: Design {
                template_id: self.catalog.template_id.clone(),
                resolution: Resolution {
                    width: inspection.width,
                    height: inspection.height,
                    unit: self.catalog.resolution_unit.clone(),
                },
                kind: self.catalog.entry_type.clone(),
                tags: self.catalog.tags.clone(),
                file_format: inspection.format_label,
                orientation: inspection.orientation,
            },
            language: self.catalog.language.clone(),
            url,
            data,
        })
    }

    fn embed(&self, path: &Path, format_label: &str) -> PipelineResult<FlyerData> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Open {
            path: path.to_path_buf(),
            message: format!("Cannot read for embedding: {}", e),
        })?;
        Ok(FlyerData {
            image_base64: format!(
                "data:image/{};base64,{}",
                format_label.to_lowercase(),
                BASE64.encode(bytes)
            ),
        })
    }
}

/// File name with its last extension removed.
fn strip_extension(file_name: &str) -> &str {
    match Path::new(file_name).extension() {
        Some(ext) => {
            let cut = file_name.len() - ext.len() - 1;
            &file_name[..cut]
        }
        None => file_name,
    }
}

/// Lexically cleaned path: `.` segments dropped and `..` folded into its
/// parent where one is present. The file system is not consulted.
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Path rendered with forward slashes regardless of platform.
fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orientation;
    use image::ImageFormat;
    use std::path::PathBuf;

    fn inspection() -> Inspection {
        Inspection {
            width: 1080,
            height: 1920,
            format_label: "JPEG".to_string(),
            detected_format: ImageFormat::Jpeg,
            orientation: Orientation::Portrait,
        }
    }

    fn listed(path: &str) -> ListedEntry {
        let path = PathBuf::from(path);
        ListedEntry {
            file_name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
            is_dir: false,
        }
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a.jpg"), "a");
        assert_eq!(strip_extension("summer.sale.png"), "summer.sale");
        assert_eq!(strip_extension("README"), "README");
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("./images/a.jpg")), Path::new("images/a.jpg"));
        assert_eq!(clean(Path::new("/tmp/x/./a.png")), Path::new("/tmp/x/a.png"));
        assert_eq!(clean(Path::new("images/../other/a.jpg")), Path::new("other/a.jpg"));
        assert_eq!(clean(Path::new("../a.jpg")), Path::new("../a.jpg"));
        assert_eq!(clean(Path::new("../../a.jpg")), Path::new("../../a.jpg"));
        assert_eq!(clean(Path::new("/../a.jpg")), Path::new("/a.jpg"));
        assert_eq!(clean(Path::new(".")), Path::new("."));
    }

    #[test]
    fn test_build_path_url_is_cleaned() {
        let builder = EntryBuilder::new(CatalogConfig::default(), EntryUrl::Path, false, "");
        let flyer = builder.build(&listed("./images/a.jpg"), inspection()).unwrap();
        assert_eq!(flyer.url, "images/a.jpg");
    }

    #[test]
    fn test_build_path_url() {
        let builder = EntryBuilder::new(
            CatalogConfig::default(),
            EntryUrl::Path,
            false,
            "http://example.com",
        );
        let flyer = builder.build(&listed("images/a.jpg"), inspection()).unwrap();

        assert_eq!(flyer.id, "a");
        assert_eq!(flyer.url, "images/a.jpg");
        assert_eq!(flyer.language, "en-US");
        assert_eq!(flyer.design.template_id, "template1");
        assert_eq!(flyer.design.kind, "image");
        assert_eq!(flyer.design.tags, vec![String::new()]);
        assert_eq!(flyer.design.resolution.unit, "px");
        assert_eq!(flyer.design.file_format, "JPEG");
        assert_eq!(flyer.design.orientation, Orientation::Portrait);
        assert!(flyer.data.is_none());
    }

    #[test]
    fn test_build_collection_url() {
        let builder = EntryBuilder::new(
            CatalogConfig::default(),
            EntryUrl::Collection,
            false,
            "https://cdn.example.com/fliers/",
        );
        let flyer = builder.build(&listed("images/a.jpg"), inspection()).unwrap();
        assert_eq!(flyer.url, "https://cdn.example.com/fliers/a.jpg");
    }

    #[test]
    fn test_build_embeds_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let builder = EntryBuilder::new(CatalogConfig::default(), EntryUrl::Path, true, "");
        let flyer = builder
            .build(&ListedEntry::from_path(&path), inspection())
            .unwrap();
        assert_eq!(flyer.data.unwrap().image_base64, "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn test_build_embed_missing_file_fails() {
        let builder = EntryBuilder::new(CatalogConfig::default(), EntryUrl::Path, true, "");
        let err = builder
            .build(&listed("/nonexistent/a.jpg"), inspection())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Open { .. }));
    }

    #[test]
    fn test_build_uses_configured_constants() {
        let catalog = CatalogConfig {
            language: "fr-FR".to_string(),
            tags: vec!["promo".to_string()],
            ..CatalogConfig::default()
        };
        let builder = EntryBuilder::new(catalog, EntryUrl::Path, false, "");
        let flyer = builder.build(&listed("x/b.png"), inspection()).unwrap();
        assert_eq!(flyer.language, "fr-FR");
        assert_eq!(flyer.design.tags, vec!["promo".to_string()]);
    }
}
