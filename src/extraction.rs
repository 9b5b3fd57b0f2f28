//! Dotted-path field resolution.
//!
//! Override rules can point a field at a nested value instead of its default
//! mapping, e.g. `fields.slug` on a linked entry or `fields.file.url` on an
//! asset. Paths are walked with plain property access; a missing segment
//! resolves to nothing rather than an error.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Represents a path to a value inside an entry or asset
///
/// # Examples
///
/// - `sys.id` - identifier of a linked entry
/// - `fields.file.url` - URL of an asset
/// - `fields.tags.[0]` - first element of an array field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// The raw path string
    pub raw: String,
    /// Parsed path segments
    pub segments: Vec<PathSegment>,
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named property (e.g., "fields", "slug")
    Field(String),
    /// An array index (e.g., [0], [5])
    Index(usize),
}

impl FieldPath {
    /// Parse a field path with a given delimiter
    ///
    /// # Example
    ///
    /// ```
    /// use entrymap::FieldPath;
    ///
    /// let path = FieldPath::parse("fields/file/url", "/");
    /// assert_eq!(path.segments.len(), 3);
    /// ```
    pub fn parse(path: &str, delimiter: &str) -> Self {
        let segments = path
            .split(delimiter)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('[') && s.ends_with(']') {
                    if let Ok(index) = s[1..s.len() - 1].parse::<usize>() {
                        return PathSegment::Index(index);
                    }
                }
                PathSegment::Field(s.to_string())
            })
            .collect();

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// Create a field path from a dotted string (the override format)
    pub fn from_dotted(path: &str) -> Self {
        Self::parse(path, ".")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk this path into a single value.
    ///
    /// Returns `None` as soon as a segment does not exist. A named segment
    /// made only of digits also indexes into arrays, so `items.0` and
    /// `items.[0]` are equivalent.
    pub fn resolve(&self, value: &Value) -> Option<Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Field(name), Value::Object(map)) => map.get(name)?,
                (PathSegment::Field(name), Value::Array(items)) => {
                    items.get(name.parse::<usize>().ok()?)?
                }
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::from_dotted(path)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_dotted(&raw))
    }
}

/// Resolve a path against a single resource or an array of resources.
///
/// A single resource yields the value at the path, or `None` if any
/// segment is missing. An array yields a new array of the same length and
/// order, with `null` standing in for elements where the path is missing.
///
/// # Example
///
/// ```
/// use entrymap::{resolve_field, FieldPath};
/// use serde_json::json;
///
/// let entries = json!([{ "sys": { "id": "a" } }, { "sys": { "id": "b" } }]);
/// let ids = resolve_field(&entries, &FieldPath::from_dotted("sys.id"));
/// assert_eq!(ids, Some(json!(["a", "b"])));
/// ```
pub fn resolve_field(value: &Value, path: &FieldPath) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| path.resolve(item).unwrap_or(Value::Null))
                .collect(),
        )),
        single => path.resolve(single),
    }
}

/// Trait for types that can extract values by field path
///
/// Implemented by anything that can present itself as the JSON shape the
/// paths are written against.
pub trait Extractor {
    /// Extract a value at the given field path
    ///
    /// Returns `Some(value)` if the path exists, `None` otherwise
    fn extract(&self, path: &FieldPath) -> Option<Value>;

    /// Extract a value and deserialize it to a specific type
    fn extract_as<T>(&self, path: &FieldPath) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.extract(path)
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

impl Extractor for Value {
    fn extract(&self, path: &FieldPath) -> Option<Value> {
        path.resolve(self)
    }
}
