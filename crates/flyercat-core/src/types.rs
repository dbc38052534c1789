//! Core data types for the flyercat catalog.
//!
//! These types are the JSON schema of the emitted documents: one [`Flyer`]
//! per decoded image, a [`Metadata`] summary, and the two document shapes
//! that wrap them.

use serde::{Deserialize, Serialize};

/// One processed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flyer {
    /// File name without its extension (not guaranteed unique)
    pub id: String,

    pub design: Design,

    /// Locale string
    #[serde(alias = "lang")]
    pub language: String,

    /// Forward-slash file path, or collection URL + file name
    pub url: String,

    /// Embedded file payload, only present in embed mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FlyerData>,
}

/// Design description of a flyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub template_id: String,
    pub resolution: Resolution,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    /// Upper-case label taken from the file extension ("JPEG", "PNG", ...)
    pub file_format: String,
    pub orientation: Orientation,
}

/// Pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub unit: String,
}

/// Raw file bytes as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerData {
    pub image_base64: String,
}

/// Orientation derived from pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Landscape only when strictly wider than tall; squares are portrait.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary record describing one catalog run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: String,

    /// RFC 3339 timestamp of generation
    pub last_updated: String,

    /// Number of entries actually emitted
    #[serde(alias = "totalFliers")]
    pub total_flyers: usize,

    /// Files that were listed but could not be opened or decoded
    #[serde(default)]
    pub skipped_files: usize,

    /// Caller-supplied collection URL, recorded verbatim
    pub url: String,

    pub schema: Schema,
}

/// Self-description of the output documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub format: String,
    pub encoding: String,
    pub filetype: String,
}

/// The catalog document of the split layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyersDocument {
    #[serde(rename = "Flyers", alias = "fliers")]
    pub flyers: Vec<Flyer>,
}

/// The single document of the combined layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedDocument {
    #[serde(rename = "Flyers", alias = "fliers")]
    pub flyers: Vec<Flyer>,
    pub metadata: Metadata,
}

/// Aggregated result of one run, owned by the caller once the workers finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Entries in arrival order
    pub flyers: Vec<Flyer>,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_flyer() -> Flyer {
        Flyer {
            id: "test123".to_string(),
            design: Design {
                template_id: "template1".to_string(),
                resolution: Resolution {
                    width: 1920,
                    height: 1080,
                    unit: "px".to_string(),
                },
                kind: "image".to_string(),
                tags: vec!["test".to_string()],
                file_format: "JPEG".to_string(),
                orientation: Orientation::Landscape,
            },
            language: "en-US".to_string(),
            url: "http://example.com/test.jpg".to_string(),
            data: None,
        }
    }

    fn sample_metadata() -> Metadata {
        Metadata {
            version: "1.0".to_string(),
            last_updated: "2024-05-01T10:00:00+00:00".to_string(),
            total_flyers: 10,
            skipped_files: 2,
            url: "http://example.com".to_string(),
            schema: Schema {
                format: "JSON".to_string(),
                encoding: "UTF-8".to_string(),
                filetype: "text".to_string(),
            },
        }
    }

    #[test]
    fn test_orientation_ties_are_portrait() {
        assert_eq!(Orientation::from_dimensions(1920, 1080), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(1080, 1920), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(500, 500), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(0, 0), Orientation::Portrait);
    }

    #[test]
    fn test_flyer_json_field_names() {
        let json = serde_json::to_value(sample_flyer()).unwrap();
        assert_eq!(json["design"]["templateId"], "template1");
        assert_eq!(json["design"]["type"], "image");
        assert_eq!(json["design"]["fileFormat"], "JPEG");
        assert_eq!(json["design"]["orientation"], "landscape");
        assert_eq!(json["design"]["resolution"]["unit"], "px");
        assert_eq!(json["language"], "en-US");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_flyer_round_trip() {
        let mut flyer = sample_flyer();
        flyer.data = Some(FlyerData {
            image_base64: "data:image/jpeg;base64,AAAA".to_string(),
        });
        let json = serde_json::to_string(&flyer).unwrap();
        assert!(json.contains("\"imageBase64\""));
        let back: Flyer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flyer);
    }

    #[test]
    fn test_metadata_round_trip() {
        let metadata = sample_metadata();
        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"totalFlyers\":10"));
        assert!(json.contains("\"lastUpdated\""));
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_combined_document_reads_flier_spelling() {
        let json = r#"{
            "fliers": [],
            "metadata": {
                "version": "1.0",
                "lastUpdated": "2024-05-01T10:00:00Z",
                "totalFliers": 0,
                "url": "path/to/fliers",
                "schema": {"format": "JSON", "encoding": "UTF-8", "filetype": "text"}
            }
        }"#;
        let doc: CombinedDocument = serde_json::from_str(json).unwrap();
        assert!(doc.flyers.is_empty());
        assert_eq!(doc.metadata.total_flyers, 0);
        assert_eq!(doc.metadata.skipped_files, 0);
    }

    #[test]
    fn test_flyers_document_key() {
        let doc = FlyersDocument {
            flyers: vec![sample_flyer()],
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["Flyers"].as_array().unwrap().len(), 1);
    }
}
