//! Override configuration loader.
//!
//! Loads override rules from YAML (or JSON) files:
//!
//! ```yaml
//! overrides:
//!   - field: content
//!     options:
//!       transformer: uppercase
//!   - field: gallery
//!     options:
//!       fieldName: galleries
//!       path: fields.file.url
//! ```
//!
//! Transformers are referenced by name and resolved against a
//! [`TransformRegistry`] when the config is turned into rules.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extraction::FieldPath;
use crate::overrides::{OverrideOptions, OverrideRule};
use crate::transform_registry::TransformRegistry;

/// Error type for loading override configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Invalid(String),
    UnknownTransformer { field: String, name: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Yaml(e) => write!(f, "Failed to parse YAML: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid override config: {}", msg),
            ConfigError::UnknownTransformer { field, name } => {
                write!(f, "Override for '{}' references unknown transformer '{}'", field, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Options of an override as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideOptionsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Name of a registered transformer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<FieldPath>,
}

/// One override as written in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideDef {
    pub field: String,

    #[serde(default)]
    pub options: OverrideOptionsDef,
}

/// Ordered override definitions loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideConfig {
    #[serde(default)]
    pub overrides: Vec<OverrideDef>,
}

impl OverrideConfig {
    /// Load override configuration from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    ///
    /// # Example
    /// ```ignore
    /// use entrymap::{OverrideConfig, TransformRegistry};
    ///
    /// let config = OverrideConfig::load_from_file("config/overrides.yaml")?;
    /// let rules = config.into_rules(&TransformRegistry::with_builtins())?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };

        tracing::debug!(
            "Loaded {} overrides from {}",
            config.overrides.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural problems.
    ///
    /// Empty field names and empty paths are rejected. Duplicate field
    /// entries are allowed (the first one wins when mapping) but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for (index, def) in self.overrides.iter().enumerate() {
            if def.field.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "override #{} has an empty 'field'",
                    index
                )));
            }
            if def.options.path.as_ref().map_or(false, FieldPath::is_empty) {
                return Err(ConfigError::Invalid(format!(
                    "override for '{}' has an empty 'path'",
                    def.field
                )));
            }
            if !seen.insert(def.field.as_str()) {
                tracing::warn!(
                    "Duplicate override for field '{}'; only the first is used",
                    def.field
                );
            }
        }

        Ok(())
    }

    /// Resolve transformer names and build the rule list, keeping order.
    pub fn into_rules(
        self,
        registry: &TransformRegistry,
    ) -> Result<Vec<OverrideRule>, ConfigError> {
        self.overrides
            .into_iter()
            .map(|def| {
                let mut options = OverrideOptions {
                    field_name: def.options.field_name,
                    value_transformer: None,
                    path: def.options.path,
                };

                if let Some(name) = def.options.transformer {
                    let transformer = registry.get(&name).cloned().ok_or_else(|| {
                        ConfigError::UnknownTransformer {
                            field: def.field.clone(),
                            name: name.clone(),
                        }
                    })?;
                    options.value_transformer = Some(transformer);
                }

                Ok(OverrideRule::with_options(def.field, options))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
overrides:
  - field: content
    options:
      transformer: uppercase
  - field: gallery
    options:
      fieldName: galleries
      path: fields.file.url
  - field: tags
"#;

    #[test]
    fn test_parse_yaml() {
        let config = OverrideConfig::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.overrides.len(), 3);
        assert_eq!(config.overrides[0].options.transformer.as_deref(), Some("uppercase"));
        assert_eq!(config.overrides[1].options.field_name.as_deref(), Some("galleries"));
        assert_eq!(
            config.overrides[1].options.path,
            Some(FieldPath::from_dotted("fields.file.url"))
        );
        assert_eq!(config.overrides[2].options, OverrideOptionsDef::default());
    }

    #[test]
    fn test_parse_json() {
        let config = OverrideConfig::from_json_str(
            r#"{ "overrides": [ { "field": "title", "options": { "fieldName": "name" } } ] }"#,
        )
        .unwrap();

        assert_eq!(config.overrides[0].field, "title");
    }

    #[test]
    fn test_into_rules() {
        let rules = OverrideConfig::from_yaml_str(SAMPLE)
            .unwrap()
            .into_rules(&TransformRegistry::with_builtins())
            .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].field, "content");
        assert!(rules[0].options.value_transformer.is_some());
        assert_eq!(rules[1].output_key("gallery"), "galleries");
    }

    #[test]
    fn test_unknown_transformer() {
        let result = OverrideConfig::from_yaml_str(SAMPLE)
            .unwrap()
            .into_rules(&TransformRegistry::new());

        assert!(matches!(
            result,
            Err(ConfigError::UnknownTransformer { ref name, .. }) if name == "uppercase"
        ));
    }

    #[test]
    fn test_empty_field_rejected() {
        let result = OverrideConfig::from_yaml_str("overrides:\n  - field: ''\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicates_allowed() {
        let yaml = "overrides:\n  - field: title\n  - field: title\n";
        let config = OverrideConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.overrides.len(), 2);
    }

    #[test]
    fn test_malformed_yaml() {
        let result = OverrideConfig::from_yaml_str("overrides: [ { field: ");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
