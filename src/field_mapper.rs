//! Entry field mapping with overrides.
//!
//! For every field of an entry, in entry order:
//! 1. look up the override rule for the field name
//! 2. compute the default mapped value
//! 3. if the rule has a `path`, resolve it against the raw value instead
//! 4. if the rule has a transformer, apply it to the result
//! 5. write the result under the rule's `fieldName` or the original name

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::Entry;
use crate::extraction::resolve_field;
use crate::mapping::map_value;
use crate::overrides::{should_override, OverrideRule};

/// Plain output of mapping one entry: output key -> mapped value
pub type MappedFields = IndexMap<String, Value>;

/// Caller context passed through the mapper untouched.
///
/// Locale and rich text handling live in the collaborators that produce
/// entries and consume the output; the mapper only carries the flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingContext {
    #[serde(default)]
    pub rich_text: bool,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,
}

impl MappingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_rich_text(mut self, rich_text: bool) -> Self {
        self.rich_text = rich_text;
        self
    }
}

/// Map the fields of an entry into a plain mapping.
///
/// Pure function of its inputs: the entry is never modified and the
/// output shares nothing with it. Each source field produces exactly one
/// output key. When two fields end up under the same key the later one
/// wins.
///
/// # Example
///
/// ```
/// use entrymap::{map_fields, Entry, MappingContext, OverrideRule};
/// use serde_json::{json, Value};
///
/// let entry = Entry::new("post-1").with_field("content", json!("content goes here"));
/// let overrides = vec![OverrideRule::new("content").transform(|v| {
///     Value::String(v.as_str().unwrap_or_default().to_uppercase())
/// })];
///
/// let result = map_fields(&entry, &MappingContext::default(), &overrides);
/// assert_eq!(result["content"], "CONTENT GOES HERE");
/// ```
pub fn map_fields(
    entry: &Entry,
    context: &MappingContext,
    overrides: &[OverrideRule],
) -> MappedFields {
    let mut output = MappedFields::with_capacity(entry.fields.len());

    for (name, raw) in &entry.fields {
        let rule = should_override(name, overrides);

        let value = match rule {
            None => map_value(raw),
            Some(rule) => apply_override(rule, name, raw),
        };

        let key = rule.map_or(name.as_str(), |rule| rule.output_key(name));
        output.insert(key.to_string(), value);
    }

    tracing::trace!(
        entry = entry.id(),
        locale = context.locale.as_deref().unwrap_or(""),
        fields = output.len(),
        "Mapped entry fields"
    );

    output
}

fn apply_override(rule: &OverrideRule, name: &str, raw: &Value) -> Value {
    let options = &rule.options;

    let value = match &options.path {
        Some(path) => resolve_field(raw, path).unwrap_or_else(|| {
            tracing::debug!("Path '{}' not found on field '{}'", path, name);
            Value::Null
        }),
        None => map_value(raw),
    };

    match &options.value_transformer {
        Some(transformer) => {
            tracing::debug!(
                field = name,
                transformer = transformer.name().unwrap_or("<fn>"),
                "Applying value transformer"
            );
            transformer.apply(&value)
        }
        None => value,
    }
}

/// Reusable mapper bundling a rule list and context
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    overrides: Vec<OverrideRule>,
    context: MappingContext,
}

impl FieldMapper {
    pub fn new(overrides: Vec<OverrideRule>) -> Self {
        Self {
            overrides,
            context: MappingContext::default(),
        }
    }

    pub fn with_context(mut self, context: MappingContext) -> Self {
        self.context = context;
        self
    }

    pub fn overrides(&self) -> &[OverrideRule] {
        &self.overrides
    }

    pub fn context(&self) -> &MappingContext {
        &self.context
    }

    pub fn map_entry(&self, entry: &Entry) -> MappedFields {
        map_fields(entry, &self.context, &self.overrides)
    }

    pub fn map_entries(&self, entries: &[Entry]) -> Vec<MappedFields> {
        entries.iter().map(|entry| self.map_entry(entry)).collect()
    }
}
