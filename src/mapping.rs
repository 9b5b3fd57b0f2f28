//! Default mapping of field values into plain objects.

use serde_json::{Map, Value};

use crate::classify::{classify, FieldKind};

/// Map a single field value to its plain representation.
///
/// Assets become flat file descriptors, linked entries expose their
/// (mapped) fields, arrays are mapped element by element and everything
/// else passes through unchanged.
pub fn map_value(value: &Value) -> Value {
    match classify(value) {
        FieldKind::Asset => map_asset(value),
        FieldKind::LinkedEntry => map_linked_entry(value),
        FieldKind::Array => match value {
            Value::Array(items) => Value::Array(map_array_field(items)),
            _ => value.clone(),
        },
        FieldKind::Scalar => value.clone(),
    }
}

/// Map every element of an array field, preserving length and order
pub fn map_array_field(items: &[Value]) -> Vec<Value> {
    items.iter().map(map_value).collect()
}

/// Flatten an asset into
/// `{title, description, url, fileName, assetType, size, width?, height?}`.
///
/// `width` and `height` are only emitted for `image/*` content types.
pub fn map_asset(asset: &Value) -> Value {
    let field = |pointer: &str| asset.pointer(pointer).cloned().unwrap_or(Value::Null);
    let content_type = field("/fields/file/contentType");

    let is_image = content_type
        .as_str()
        .map_or(false, |ct| ct.starts_with("image/"));

    let mut mapped = Map::new();
    mapped.insert("title".to_string(), field("/fields/title"));
    mapped.insert("description".to_string(), field("/fields/description"));
    mapped.insert("url".to_string(), field("/fields/file/url"));
    mapped.insert("fileName".to_string(), field("/fields/file/fileName"));
    mapped.insert("assetType".to_string(), content_type);
    mapped.insert("size".to_string(), field("/fields/file/details/size"));
    if is_image {
        mapped.insert("width".to_string(), field("/fields/file/details/image/width"));
        mapped.insert("height".to_string(), field("/fields/file/details/image/height"));
    }

    Value::Object(mapped)
}

/// Expose a linked entry as `{id, contentType, fields}`.
///
/// Nested fields go through [`map_value`]; overrides are never applied
/// below the top-level entry.
pub fn map_linked_entry(entry: &Value) -> Value {
    let fields = match entry.get("fields") {
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(name, value)| (name.clone(), map_value(value)))
            .collect(),
        _ => Map::new(),
    };

    let mut mapped = Map::new();
    mapped.insert(
        "id".to_string(),
        entry.pointer("/sys/id").cloned().unwrap_or(Value::Null),
    );
    mapped.insert(
        "contentType".to_string(),
        entry
            .pointer("/sys/contentType/sys/id")
            .cloned()
            .unwrap_or(Value::Null),
    );
    mapped.insert("fields".to_string(), Value::Object(fields));

    Value::Object(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(title: &str, file_name: &str, content_type: &str, width: u64) -> Value {
        let image = if content_type.contains("image") {
            json!({ "width": width, "height": width })
        } else {
            Value::Null
        };
        json!({
            "sys": { "id": "12345", "type": "Asset" },
            "fields": {
                "title": title,
                "description": format!("{} description", title),
                "file": {
                    "url": "https://source.unsplash.com",
                    "fileName": file_name,
                    "contentType": content_type,
                    "details": { "size": 5120, "image": image }
                }
            }
        })
    }

    #[test]
    fn test_simple_array() {
        let mapped = map_array_field(&[json!("dog"), json!("cat"), json!("duck")]);

        assert_eq!(mapped.len(), 3);
        assert_eq!(mapped[0], "dog");
        assert_eq!(mapped[2], "duck");
    }

    #[test]
    fn test_empty_array() {
        assert!(map_array_field(&[]).is_empty());
    }

    #[test]
    fn test_array_of_assets() {
        let items = [
            asset("Some Image", "some-image-1.png", "image/png", 1200),
            asset("Some Image 2", "some-image-2.jpg", "image/jpeg", 100),
        ];
        let mapped = map_array_field(&items);

        assert_eq!(mapped[0]["assetType"], "image/png");
        assert_eq!(mapped[0]["width"], 1200);
        assert_eq!(mapped[1]["assetType"], "image/jpeg");
        assert_eq!(mapped[1]["width"], 100);
        assert_eq!(mapped[1]["fileName"], "some-image-2.jpg");
    }

    #[test]
    fn test_array_of_custom_objects() {
        let items = [
            json!({ "firstName": "Jim", "lastName": "Johnson" }),
            json!({ "firstName": "Rebecca", "lastName": "Johnson" }),
        ];
        let mapped = map_array_field(&items);

        assert_eq!(mapped[0]["firstName"], "Jim");
        assert_eq!(mapped[1]["firstName"], "Rebecca");
    }

    #[test]
    fn test_non_image_asset_has_no_dimensions() {
        let mapped = map_asset(&asset("Brochure", "brochure.pdf", "application/pdf", 0));

        assert_eq!(mapped["assetType"], "application/pdf");
        assert_eq!(mapped["size"], 5120);
        assert!(mapped.get("width").is_none());
        assert!(mapped.get("height").is_none());
    }

    #[test]
    fn test_linked_entry() {
        let linked = json!({
            "sys": {
                "id": "author-1",
                "contentType": { "sys": { "type": "Link", "id": "author" } }
            },
            "fields": {
                "name": "Ada",
                "avatar": asset("Ada", "ada.png", "image/png", 64)
            }
        });
        let mapped = map_value(&linked);

        assert_eq!(mapped["id"], "author-1");
        assert_eq!(mapped["contentType"], "author");
        assert_eq!(mapped["fields"]["name"], "Ada");
        assert_eq!(mapped["fields"]["avatar"]["url"], "https://source.unsplash.com");
        assert!(mapped.get("sys").is_none());
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(map_value(&json!("text")), json!("text"));
        assert_eq!(map_value(&json!(3.5)), json!(3.5));
        assert_eq!(map_value(&json!({ "lat": 1, "lon": 2 })), json!({ "lat": 1, "lon": 2 }));
    }
}
