//! entrymap CLI - map exported CMS entries into plain objects
//!
//! Reads entries as JSON (one entry or an array), applies override rules from
//! a YAML/JSON file and writes the mapped objects to stdout.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use entrymap::{
    classify, is_date_field, parse_date_field, write_mapped, Asset, Entry, FieldKind, FieldMapper,
    MappingContext, OutputFormat, OverrideConfig, OverrideRule, TransformRegistry,
};

#[derive(Parser)]
#[command(name = "entrymap")]
#[command(version, about = "Map CMS entries into plain objects with field overrides", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map entries from a JSON file and write the result to stdout
    Map {
        /// JSON file holding one entry or an array of entries
        #[arg(short, long)]
        input: PathBuf,

        /// Override file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Output format (ndjson, json)
        #[arg(short, long, default_value = "ndjson")]
        format: OutputFormat,

        /// Locale passed through to the mapping context
        #[arg(short, long)]
        locale: Option<String>,

        /// Mark entries as rich text content
        #[arg(long)]
        rich_text: bool,
    },

    /// Validate an override file against the built-in transformers
    Validate {
        /// Override file (YAML, or JSON with a .json extension)
        #[arg(short, long, default_value = "overrides.yaml")]
        overrides: PathBuf,
    },

    /// Show how a single value would be classified
    Classify {
        /// JSON literal; anything that is not valid JSON is treated as a string
        value: String,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Map { input, overrides, format, locale, rich_text } => {
            map_entries(input, overrides, format, locale, rich_text)
        }
        Commands::Validate { overrides } => validate_overrides(overrides),
        Commands::Classify { value } => classify_value(&value),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_rules(path: &Path) -> Result<Vec<OverrideRule>, String> {
    let config = OverrideConfig::load_from_file(path)
        .map_err(|e| format!("Failed to load overrides from {}: {}", path.display(), e))?;

    config
        .into_rules(&TransformRegistry::with_builtins())
        .map_err(|e| e.to_string())
}

/// Map entries and write them to stdout
fn map_entries(
    input: PathBuf,
    overrides: Option<PathBuf>,
    format: OutputFormat,
    locale: Option<String>,
    rich_text: bool,
) -> Result<(), String> {
    let contents = fs::read_to_string(&input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", input.display(), e))?;
    let entries = Entry::many_from_value(json).map_err(|e| e.to_string())?;

    let rules = match &overrides {
        Some(path) => load_rules(path)?,
        None => Vec::new(),
    };

    let context = MappingContext {
        rich_text,
        locale,
        ..MappingContext::default()
    };
    let mapper = FieldMapper::new(rules).with_context(context);

    tracing::info!(
        "Mapping {} entries with {} overrides",
        entries.len(),
        mapper.overrides().len()
    );

    let mapped = mapper.map_entries(&entries);
    write_mapped(io::stdout().lock(), format, &mapped).map_err(|e| e.to_string())
}

fn validate_overrides(path: PathBuf) -> Result<(), String> {
    println!("🔍 Validating overrides in {}...", path.display());

    let rules = load_rules(&path)?;

    for rule in &rules {
        let mut actions = Vec::new();
        if let Some(name) = &rule.options.field_name {
            actions.push(format!("rename -> {}", name));
        }
        if let Some(p) = &rule.options.path {
            actions.push(format!("path {}", p));
        }
        if let Some(t) = &rule.options.value_transformer {
            actions.push(format!("transform {}", t.name().unwrap_or("<fn>")));
        }
        if actions.is_empty() {
            actions.push("no-op".to_string());
        }
        println!("  ✓ {}: {}", rule.field, actions.join(", "));
    }

    println!("✅ {} overrides are valid!", rules.len());
    Ok(())
}

fn classify_value(raw: &str) -> Result<(), String> {
    let value: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let kind = classify(&value);
    println!("kind: {:?}", kind);

    if kind == FieldKind::Asset {
        if let Some(asset) = Asset::from_value(&value) {
            println!("file: {} ({})", asset.fields.file.file_name, asset.fields.file.content_type);
        }
    }

    match parse_date_field(&value) {
        Some(date) => println!("date: {}", date.to_rfc3339()),
        None if is_date_field(&value) => println!("date: pattern match, not a calendar value"),
        None => println!("date: no"),
    }

    Ok(())
}
