//! Named value transformers.
//!
//! Override files cannot carry code, so they reference transformers by
//! name. The registry maps those names to [`ValueTransformer`]s; callers
//! can register their own next to the built-ins.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use serde_json::Value;

use crate::classify::parse_date_field;
use crate::overrides::ValueTransformer;

/// Registry for storing and looking up transformers by name
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, ValueTransformer>,
}

impl TransformRegistry {
    /// Create a new empty transform registry
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in transformers.
    ///
    /// String transformers leave non-string values untouched.
    ///
    /// | name | effect |
    /// |------|--------|
    /// | `uppercase`, `lowercase`, `trim` | string case / whitespace |
    /// | `snake_case`, `camel_case`, `kebab_case` | identifier casing |
    /// | `first` | first element of an array (`null` if empty) |
    /// | `count` | length of an array |
    /// | `rfc3339` | normalise a date field to RFC 3339 |
    /// | `title` | `fields.title` of a linked entry, or `title` of a mapped value |
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_fn("uppercase", |v| map_str(v, str::to_uppercase));
        registry.register_fn("lowercase", |v| map_str(v, str::to_lowercase));
        registry.register_fn("trim", |v| map_str(v, |s| s.trim().to_string()));
        registry.register_fn("snake_case", |v| map_str(v, |s| s.to_case(Case::Snake)));
        registry.register_fn("camel_case", |v| map_str(v, |s| s.to_case(Case::Camel)));
        registry.register_fn("kebab_case", |v| map_str(v, |s| s.to_case(Case::Kebab)));

        registry.register_fn("first", |v| match v {
            Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        });
        registry.register_fn("count", |v| match v {
            Value::Array(items) => Value::from(items.len()),
            other => other.clone(),
        });
        registry.register_fn("rfc3339", |v| match parse_date_field(v) {
            Some(date) => Value::String(date.to_rfc3339()),
            None => v.clone(),
        });
        registry.register_fn("title", |v| {
            v.pointer("/fields/title")
                .or_else(|| v.get("title"))
                .cloned()
                .unwrap_or_else(|| v.clone())
        });

        registry
    }

    /// Register a transformer under a name, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, transformer: ValueTransformer) {
        self.transforms.insert(name.into(), transformer);
    }

    /// Register a plain function as a named transformer
    pub fn register_fn<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.register(name, ValueTransformer::named(name, func));
    }

    pub fn get(&self, name: &str) -> Option<&ValueTransformer> {
        self.transforms.get(name)
    }

    /// Check if a transform is registered
    pub fn has_transform(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted
    pub fn list_transforms(&self) -> Vec<String> {
        let mut names: Vec<String> = self.transforms.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.transforms.len()
    }
}

fn map_str(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(registry: &TransformRegistry, name: &str, value: Value) -> Value {
        registry.get(name).unwrap().apply(&value)
    }

    #[test]
    fn test_register_and_call_transform() {
        let mut registry = TransformRegistry::new();
        registry.register_fn("exclaim", |v| map_str(v, |s| format!("{}!", s)));

        assert_eq!(call(&registry, "exclaim", json!("hello")), json!("hello!"));
        assert_eq!(registry.get("exclaim").unwrap().name(), Some("exclaim"));
    }

    #[test]
    fn test_transform_not_found() {
        let registry = TransformRegistry::new();
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_has_transform() {
        let registry = TransformRegistry::with_builtins();

        assert!(registry.has_transform("uppercase"));
        assert!(!registry.has_transform("other_fn"));
        assert!(registry.list_transforms().contains(&"rfc3339".to_string()));
    }

    #[test]
    fn test_string_builtins() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(call(&registry, "uppercase", json!("content goes here")), json!("CONTENT GOES HERE"));
        assert_eq!(call(&registry, "trim", json!("  padded ")), json!("padded"));
        assert_eq!(call(&registry, "snake_case", json!("heroImage")), json!("hero_image"));
        assert_eq!(call(&registry, "kebab_case", json!("Hero Image")), json!("hero-image"));
        assert_eq!(call(&registry, "uppercase", json!(42)), json!(42));
    }

    #[test]
    fn test_array_builtins() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(call(&registry, "first", json!(["a", "b"])), json!("a"));
        assert_eq!(call(&registry, "first", json!([])), Value::Null);
        assert_eq!(call(&registry, "count", json!(["a", "b", "c"])), json!(3));
    }

    #[test]
    fn test_rfc3339_builtin() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(
            call(&registry, "rfc3339", json!("2021-07-08T18:00-05:00")),
            json!("2021-07-08T18:00:00-05:00")
        );
        assert_eq!(call(&registry, "rfc3339", json!("2021-07-08")), json!("2021-07-08"));
    }

    #[test]
    fn test_title_builtin() {
        let registry = TransformRegistry::with_builtins();

        let linked = json!({ "id": "e1", "fields": { "title": "Linked" } });
        assert_eq!(call(&registry, "title", linked), json!("Linked"));

        let asset = json!({ "title": "Logo", "url": "//x/logo.png" });
        assert_eq!(call(&registry, "title", asset), json!("Logo"));
    }
}
