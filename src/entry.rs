//! Source data model for CMS entries and assets.
//!
//! These types mirror the JSON shape delivered by the CMS client layer:
//! every record has a `sys` envelope, a `fields` mapping and (for entries)
//! a `metadata` block. Field values stay as raw JSON so the mapper can
//! classify them without knowing the content model.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::extraction::{Extractor, FieldPath};

/// Error type for decoding entries
#[derive(Debug)]
pub enum EntryError {
    Json(serde_json::Error),
    NotAnEntry(String),
}

impl From<serde_json::Error> for EntryError {
    fn from(err: serde_json::Error) -> Self {
        EntryError::Json(err)
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::Json(e) => write!(f, "JSON error: {}", e),
            EntryError::NotAnEntry(msg) => write!(f, "Not an entry: {}", msg),
        }
    }
}

impl std::error::Error for EntryError {}

/// Reference to another record (content type, tag, unresolved link)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

impl Link {
    /// Build a `Link` pointing at a content type
    pub fn content_type(id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                id: id.into(),
                kind: "Link".to_string(),
                link_type: Some("ContentType".to_string()),
            },
        }
    }
}

/// System envelope shared by entries and assets.
///
/// Timestamps are kept as the strings the CMS sent; some spaces hand back
/// bare dates here and the mapper never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub tags: Vec<Link>,
}

/// A CMS content record.
///
/// `fields` keeps the order the fields arrived in so mapped output iterates
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub sys: Sys,

    #[serde(default)]
    pub fields: IndexMap<String, Value>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Entry {
    /// Create an entry with the given id and no fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            sys: Sys {
                id: id.into(),
                kind: "Entry".to_string(),
                ..Sys::default()
            },
            ..Self::default()
        }
    }

    /// Builder-style field insertion, mostly for tests and fixtures
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_content_type(mut self, id: impl Into<String>) -> Self {
        self.sys.content_type = Some(Link::content_type(id));
        self
    }

    /// Decode an entry from its JSON shape.
    ///
    /// The value must be an object carrying a `fields` object; `sys` and
    /// `metadata` are optional and default to empty.
    pub fn from_value(value: Value) -> Result<Self, EntryError> {
        match &value {
            Value::Object(map) => {
                if !map.get("fields").map_or(false, Value::is_object) {
                    return Err(EntryError::NotAnEntry(
                        "missing 'fields' object".to_string(),
                    ));
                }
            }
            other => {
                return Err(EntryError::NotAnEntry(format!(
                    "expected object, got {}",
                    json_type_name(other)
                )))
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Decode either a single entry or an array of entries
    pub fn many_from_value(value: Value) -> Result<Vec<Self>, EntryError> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            single => Ok(vec![Self::from_value(single)?]),
        }
    }

    /// The entry back in its JSON shape
    pub fn to_value(&self) -> Value {
        json!({
            "sys": self.sys,
            "fields": self.fields,
            "metadata": self.metadata,
        })
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn content_type_id(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|link| link.sys.id.as_str())
    }
}

impl Extractor for Entry {
    fn extract(&self, path: &FieldPath) -> Option<Value> {
        path.resolve(&self.to_value())
    }
}

/// Image dimensions attached to image assets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDetails {
    #[serde(default)]
    pub width: Option<u64>,

    #[serde(default)]
    pub height: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDetails {
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub image: Option<ImageDetails>,
}

/// File descriptor of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    pub url: String,
    pub file_name: String,
    pub content_type: String,

    #[serde(default)]
    pub details: FileDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub file: AssetFile,
}

/// A CMS-managed media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub sys: Sys,

    pub fields: AssetFields,
}

impl Asset {
    /// Typed view of an asset-shaped value.
    ///
    /// Returns `None` when the value is not an asset or carries fields of
    /// an unexpected type (e.g. a numeric title).
    pub fn from_value(value: &Value) -> Option<Self> {
        if crate::classify::classify(value) != crate::classify::FieldKind::Asset {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_image(&self) -> bool {
        self.fields.file.content_type.starts_with("image/")
    }
}

/// Name of a JSON value's type, for messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry_json() -> Value {
        json!({
            "metadata": { "tags": [] },
            "sys": {
                "id": "my-id",
                "createdAt": "2016-01-10",
                "updatedAt": "2016-01-10",
                "type": "Entry",
                "contentType": {
                    "sys": { "type": "Link", "id": "post", "linkType": "ContentType" }
                },
                "locale": "en-US"
            },
            "fields": {
                "title": "My Awesome Title",
                "slug": "my-awesome-title"
            }
        })
    }

    #[test]
    fn test_entry_from_value() {
        let entry = Entry::from_value(sample_entry_json()).unwrap();

        assert_eq!(entry.id(), "my-id");
        assert_eq!(entry.content_type_id(), Some("post"));
        assert_eq!(entry.sys.locale.as_deref(), Some("en-US"));
        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields.get_index(0).map(|(k, _)| k.as_str()), Some("title"));
    }

    #[test]
    fn test_entry_rejects_non_entries() {
        assert!(matches!(
            Entry::from_value(json!("hello")),
            Err(EntryError::NotAnEntry(_))
        ));
        assert!(matches!(
            Entry::from_value(json!({ "sys": { "id": "x" } })),
            Err(EntryError::NotAnEntry(_))
        ));
    }

    #[test]
    fn test_many_from_value() {
        let entries = Entry::many_from_value(json!([
            { "fields": { "a": 1 } },
            { "fields": { "b": 2 } }
        ]))
        .unwrap();
        assert_eq!(entries.len(), 2);

        let single = Entry::many_from_value(sample_entry_json()).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_entry_extract() {
        let entry = Entry::from_value(sample_entry_json()).unwrap();

        assert_eq!(
            entry.extract(&FieldPath::from_dotted("fields.slug")),
            Some(json!("my-awesome-title"))
        );
        assert_eq!(
            entry.extract(&FieldPath::from_dotted("sys.contentType.sys.id")),
            Some(json!("post"))
        );
        assert_eq!(entry.extract(&FieldPath::from_dotted("fields.missing")), None);
    }

    #[test]
    fn test_asset_from_value() {
        let value = json!({
            "sys": { "id": "12345", "type": "Asset" },
            "fields": {
                "title": "Logo",
                "file": {
                    "url": "//images.example.com/logo.svg",
                    "fileName": "logo.svg",
                    "contentType": "image/svg+xml",
                    "details": { "size": 2048, "image": { "width": 64, "height": 32 } }
                }
            }
        });

        let asset = Asset::from_value(&value).unwrap();
        assert!(asset.is_image());
        assert_eq!(asset.fields.file.file_name, "logo.svg");
        assert_eq!(asset.fields.description, None);
        assert_eq!(
            asset.fields.file.details.image.and_then(|i| i.width),
            Some(64)
        );

        assert!(Asset::from_value(&json!({ "fields": { "title": "x" } })).is_none());
    }
}
