//! Configuration management for the engine.
//!
//! This module handles loading, validating, and saving engine configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{
    CONFIG_DIR_ENV, CONFIG_DIR_NAME, DEFAULT_START_CHARACTER, DEFAULT_STYLESHEET_ALLOW_LIST,
    OUTPUT_DIR_NAME, SETTINGS_FILE_NAME,
};
use crate::expansions::ExpansionSettings;
use crate::services::write_atomic;

/// Macro expansion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Character marking a macro reference
    pub start_character: String,
    /// Look unresolved macros up in the generated stylesheets
    pub fallback_to_stylesheet: bool,
    /// Extra expansion source documents, merged after the built-in ones
    pub extra_sources: Vec<PathBuf>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            start_character: DEFAULT_START_CHARACTER.to_string(),
            fallback_to_stylesheet: false,
            extra_sources: Vec::new(),
        }
    }
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Settings document (defaults to `<config dir>/settings.json`)
    pub settings_file: Option<PathBuf>,
    /// Directory for generated stylesheets (defaults to `<config dir>/css`)
    pub output_dir: Option<PathBuf>,
}

/// Stylesheet introspection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Identifier prefixes of stylesheets trusted for lookups
    pub allow_list: Vec<String>,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            allow_list: DEFAULT_STYLESHEET_ALLOW_LIST
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        }
    }
}

/// Engine configuration.
///
/// # File Location
///
/// - `$TOKENKIT_CONFIG_DIR/config.toml` when the variable is set
/// - Linux: `~/.config/tokenkit/config.toml`
/// - macOS: `~/Library/Application Support/tokenkit/config.toml`
/// - Windows: `%APPDATA%\tokenkit\config.toml`
///
/// # Validation
///
/// - `start_character` must be exactly one character that is not
///   alphanumeric, whitespace, `-` or `_`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Macro expansion settings
    pub expansions: ExpansionConfig,
    /// File system paths
    pub paths: PathConfig,
    /// Stylesheet introspection settings
    pub stylesheets: StylesheetConfig,
}

impl EngineConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Honors `TOKENKIT_CONFIG_DIR`, otherwise the platform config directory.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)
    }

    /// Saves configuration to an explicit file using atomic write.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        write_atomic(config_path, &content)
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.expansions.start_character.chars();
        let (Some(start), None) = (chars.next(), chars.next()) else {
            anyhow::bail!(
                "start_character must be exactly one character, got '{}'",
                self.expansions.start_character
            );
        };

        if start.is_alphanumeric() || start.is_whitespace() || start == '-' || start == '_' {
            anyhow::bail!("start_character '{start}' would be part of a macro name");
        }

        Ok(())
    }

    /// Sets the macro start character with validation.
    pub fn set_start_character(&mut self, start: &str) -> Result<()> {
        let previous = std::mem::replace(&mut self.expansions.start_character, start.to_string());
        if let Err(e) = self.validate() {
            self.expansions.start_character = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Expansion settings handed to the registry and resolver.
    #[must_use]
    pub fn expansion_settings(&self) -> ExpansionSettings {
        ExpansionSettings {
            start_character: self
                .expansions
                .start_character
                .chars()
                .next()
                .unwrap_or(DEFAULT_START_CHARACTER),
            fallback_to_stylesheet: self.expansions.fallback_to_stylesheet,
        }
    }

    /// Resolved settings document path.
    pub fn settings_file(&self) -> Result<PathBuf> {
        match &self.paths.settings_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(SETTINGS_FILE_NAME)),
        }
    }

    /// Resolved stylesheet output directory.
    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.paths.output_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(OUTPUT_DIR_NAME)),
        }
    }
}
