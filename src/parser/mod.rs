//! Parsing for user-authored settings patch documents.
//!
//! A patch is a flat mapping of setting keys to values. It may be written as
//! JSON, JSON5, YAML or TOML; every format is normalized to a
//! [`serde_json::Value`] so the settings store sees a single shape.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported patch document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchFormat {
    /// `.json`
    Json,
    /// `.json5`
    Json5,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl PatchFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "json5" => Some(Self::Json5),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Reads a patch document, choosing the parser by file extension.
pub fn load_patch(path: &Path) -> Result<Value> {
    let format = PatchFormat::from_path(path).with_context(|| {
        format!(
            "Unsupported patch file extension: {} (expected .json, .json5, .yaml, .yml or .toml)",
            path.display()
        )
    })?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read patch file: {}", path.display()))?;

    parse_patch(&content, format)
        .with_context(|| format!("Failed to parse patch file: {}", path.display()))
}

/// Parses patch text in the given format.
pub fn parse_patch(content: &str, format: PatchFormat) -> Result<Value> {
    let value = match format {
        PatchFormat::Json => serde_json::from_str(content).context("Invalid JSON")?,
        PatchFormat::Json5 => json5::from_str(content).context("Invalid JSON5")?,
        PatchFormat::Yaml => serde_yml::from_str(content).context("Invalid YAML")?,
        PatchFormat::Toml => {
            let table: toml::Table = toml::from_str(content).context("Invalid TOML")?;
            serde_json::to_value(table).context("TOML document is not representable as JSON")?
        }
    };
    Ok(value)
}
