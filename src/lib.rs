//! # Entrymap: CMS Entry Field Mapping
//!
//! Entrymap turns headless CMS entries into plain, consumer-facing objects.
//! Entries carry typed fields (scalars, arrays, linked entries, media
//! assets, dates); the mapper flattens them and applies caller-supplied
//! overrides for renaming, path resolution and value transformation.
//!
//! ## Features
//!
//! - **Explicit classification**: every value is tagged once as asset, linked entry, array or scalar
//! - **Asset flattening**: file descriptors become `{title, url, fileName, assetType, size, width, height}`
//! - **Dotted path resolution**: `sys.id`, `fields.file.url`, over single values or arrays
//! - **Overrides**: rename output keys, resolve paths, apply named or inline transformers
//! - **Date detection**: date-and-time strings are told apart from bare dates and free text
//!
//! ## Example: Override File
//!
//! ```yaml
//! overrides:
//!   - field: content
//!     options:
//!       transformer: uppercase
//!   - field: relatedPosts
//!     options:
//!       fieldName: related
//!       path: fields.slug
//! ```
//!
//! ## Example: Mapping an Entry
//!
//! ```
//! use entrymap::{FieldMapper, Entry, OverrideRule};
//! use serde_json::json;
//!
//! let entry = Entry::new("post-1")
//!     .with_field("title", json!("My Title"))
//!     .with_field("tags", json!(["rust", "cms"]));
//!
//! let mapper = FieldMapper::new(vec![OverrideRule::new("title").rename("name")]);
//! let mapped = mapper.map_entry(&entry);
//!
//! assert_eq!(mapped["name"], "My Title");
//! assert_eq!(mapped["tags"], json!(["rust", "cms"]));
//! ```

// Core modules
pub mod entry;
pub mod classify;
pub mod extraction;
pub mod mapping;
pub mod overrides;
pub mod field_mapper;

// Configuration and named transformers
pub mod transform_registry;
pub mod config;

// Output writers
pub mod serialization;

// Re-export key types
pub use entry::{Asset, AssetFile, Entry, EntryError, Link, Metadata, Sys};
pub use classify::{classify, is_date_field, parse_date_field, DateValue, FieldKind};
pub use extraction::{resolve_field, Extractor, FieldPath, PathSegment};
pub use mapping::{map_array_field, map_asset, map_linked_entry, map_value};
pub use overrides::{should_override, OverrideOptions, OverrideRule, ValueTransformer};
pub use field_mapper::{map_fields, FieldMapper, MappedFields, MappingContext};
pub use transform_registry::TransformRegistry;
pub use config::{ConfigError, OverrideConfig, OverrideDef};
pub use serialization::{write_mapped, OutputFormat, SerializationError};
