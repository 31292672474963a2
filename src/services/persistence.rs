//! Settings persistence collaborators.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::write_atomic;
use crate::models::SettingsSnapshot;

/// Current version of the on-disk settings document.
const SETTINGS_DOCUMENT_VERSION: u32 = 1;

/// Stores and restores complete settings snapshots.
pub trait SettingsPersistence {
    /// Loads the last saved snapshot. A store that was never written yields an
    /// empty snapshot.
    fn load(&self) -> Result<SettingsSnapshot>;

    /// Saves a complete snapshot, replacing the previous one.
    fn save(&self, snapshot: &SettingsSnapshot) -> Result<()>;
}

/// On-disk settings document.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsDocument {
    version: u32,
    saved_at: DateTime<Utc>,
    vars: SettingsSnapshot,
}

/// Persists snapshots as a versioned JSON document.
///
/// ```json
/// { "version": 1, "saved_at": "2024-05-01T12:00:00Z", "vars": { "color-primary": "#336699" } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Creates a persistence collaborator writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the settings document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPersistence for JsonFilePersistence {
    fn load(&self) -> Result<SettingsSnapshot> {
        if !self.path.exists() {
            return Ok(SettingsSnapshot::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;

        let document: SettingsDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))?;

        if document.version > SETTINGS_DOCUMENT_VERSION {
            anyhow::bail!(
                "Settings file {} has version {}, newest supported is {}",
                self.path.display(),
                document.version,
                SETTINGS_DOCUMENT_VERSION
            );
        }

        Ok(document.vars)
    }

    fn save(&self, snapshot: &SettingsSnapshot) -> Result<()> {
        let document = SettingsDocument {
            version: SETTINGS_DOCUMENT_VERSION,
            saved_at: Utc::now(),
            vars: snapshot.clone(),
        };

        let content =
            serde_json::to_string_pretty(&document).context("Failed to serialize settings")?;

        write_atomic(&self.path, &content)
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<SettingsSnapshot>>,
    save_count: Mutex<usize>,
}

impl MemoryPersistence {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: SettingsSnapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            save_count: Mutex::new(0),
        }
    }

    /// The most recently saved snapshot, if any.
    #[must_use]
    pub fn last_saved(&self) -> Option<SettingsSnapshot> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsPersistence for MemoryPersistence {
    fn load(&self) -> Result<SettingsSnapshot> {
        Ok(self.last_saved().unwrap_or_default())
    }

    fn save(&self, snapshot: &SettingsSnapshot) -> Result<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_file_missing_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonFilePersistence::new(temp_dir.path().join("settings.json"));
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");
        let persistence = JsonFilePersistence::new(&path);

        let snapshot: SettingsSnapshot =
            [("color-primary", "#336699"), ("option-dark-mode", "on")]
                .into_iter()
                .collect();
        persistence.save(&snapshot).unwrap();

        assert_eq!(persistence.load().unwrap(), snapshot);
        assert!(!path.with_extension("json.tmp").exists());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert!(raw["saved_at"].is_string());
        assert_eq!(raw["vars"]["color-primary"], "#336699");
    }

    #[test]
    fn test_json_file_rejects_newer_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"version": 2, "saved_at": "2024-01-01T00:00:00Z", "vars": {}}"#,
        )
        .unwrap();

        let err = JsonFilePersistence::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn test_json_file_reports_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(JsonFilePersistence::new(&path).load().is_err());
    }

    #[test]
    fn test_memory_persistence_counts_saves() {
        let persistence = MemoryPersistence::new();
        assert!(persistence.load().unwrap().is_empty());

        let snapshot: SettingsSnapshot = [("a", "1")].into_iter().collect();
        persistence.save(&snapshot).unwrap();

        assert_eq!(persistence.save_count(), 1);
        assert_eq!(persistence.last_saved(), Some(snapshot));
    }
}
