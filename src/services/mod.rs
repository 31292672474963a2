//! Service layer for settings state and its collaborators.
//!
//! This module contains the settings store together with the persistence and
//! CSS generation collaborators it coordinates.

pub mod css_generator;
pub mod persistence;
pub mod settings_store;

// Re-export commonly used types and functions
pub use css_generator::{CssGenerator, NoopGenerator, VariablesCssGenerator};
pub use persistence::{JsonFilePersistence, MemoryPersistence, SettingsPersistence};
pub use settings_store::{
    backfill_saturation, base_color_name, entries_from_json, SettingsStore, UpdateOptions,
    UpdateReport,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Writes `content` to `path` through a temp file and rename, creating parent
/// directories as needed.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let extension = path
        .extension()
        .map_or_else(|| "tmp".to_string(), |ext| format!("{}.tmp", ext.to_string_lossy()));
    let temp_path = path.with_extension(extension);

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("tokens.css");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("css.tmp").exists());
    }
}
