//! Override rules and their resolution.
//!
//! A rule targets one source field by exact name and may rename the output
//! key, resolve a dotted path instead of the default mapping, and/or run a
//! value transformer on the result.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::extraction::FieldPath;

/// Function value applied to a mapped field.
///
/// This is the only injection point for caller behaviour; transformers
/// take a value and return a new one.
#[derive(Clone)]
pub struct ValueTransformer {
    name: Option<String>,
    func: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
}

impl ValueTransformer {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// A transformer carrying a name, as registered in a `TransformRegistry`
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn apply(&self, value: &Value) -> Value {
        (self.func)(value)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for ValueTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "ValueTransformer({})", name),
            None => write!(f, "ValueTransformer(<fn>)"),
        }
    }
}

/// What an override does to its field
#[derive(Debug, Clone, Default)]
pub struct OverrideOptions {
    /// Output key to use instead of the source field name
    pub field_name: Option<String>,

    /// Applied last, after default mapping or path resolution
    pub value_transformer: Option<ValueTransformer>,

    /// Resolved against the raw field value instead of the default mapping
    pub path: Option<FieldPath>,
}

impl OverrideOptions {
    pub fn rename(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn transform(mut self, transformer: ValueTransformer) -> Self {
        self.value_transformer = Some(transformer);
        self
    }

    pub fn resolve(mut self, path: impl Into<FieldPath>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Override for a single source field
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub field: String,
    pub options: OverrideOptions,
}

impl OverrideRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            options: OverrideOptions::default(),
        }
    }

    pub fn with_options(field: impl Into<String>, options: OverrideOptions) -> Self {
        Self {
            field: field.into(),
            options,
        }
    }

    pub fn rename(mut self, field_name: impl Into<String>) -> Self {
        self.options = self.options.rename(field_name);
        self
    }

    pub fn transform<F>(mut self, func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.options = self.options.transform(ValueTransformer::new(func));
        self
    }

    pub fn resolve(mut self, path: impl Into<FieldPath>) -> Self {
        self.options = self.options.resolve(path);
        self
    }

    /// Output key for a field this rule matched
    pub fn output_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.options.field_name.as_deref().unwrap_or(field)
    }
}

/// Find the override for a field.
///
/// Matching is exact name equality and the first matching rule wins;
/// later rules for the same field are never consulted.
pub fn should_override<'a>(field: &str, overrides: &'a [OverrideRule]) -> Option<&'a OverrideRule> {
    overrides.iter().find(|rule| rule.field == field)
}
