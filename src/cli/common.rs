//! Shared CLI plumbing: error type, exit codes and engine construction.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::EngineConfig;
use crate::constants::{EXPANSIONS_CSS_FILE, TOKENS_CSS_FILE};
use crate::error::{Feedback, TokenError};
use crate::expansions::{builtin_sources, load_source_file, ExpansionRegistry, ExpansionSettings};
use crate::services::{JsonFilePersistence, SettingsStore, VariablesCssGenerator};
use crate::stylesheet::{CssFile, StylesheetSet};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded (including "nothing to do")
    Success = 0,
    /// Invalid input or a derivation failure
    ValidationError = 1,
    /// File system or internal failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error reported by a CLI command.
#[derive(Debug)]
pub struct CliError {
    /// Message printed to stderr
    pub message: String,
    /// Exit code for the process
    pub exit_code: ExitCode,
}

impl CliError {
    /// Invalid input or a derivation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::ValidationError,
        }
    }

    /// File system or internal failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<TokenError> for CliError {
    fn from(error: TokenError) -> Self {
        match error.feedback() {
            Feedback::Internal => Self::io(error.to_string()),
            Feedback::NothingToDo | Feedback::InvalidInput | Feedback::DerivationFailure => {
                Self::validation(error.to_string())
            }
        }
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Settings store wired to the configured files.
pub type FileSettingsStore = SettingsStore<JsonFilePersistence, VariablesCssGenerator>;

/// Loads the engine configuration.
pub fn load_config() -> CliResult<EngineConfig> {
    EngineConfig::load().map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
}

/// Builds the registry from the built-in sources, then the configured extra
/// sources, then `extra`.
pub fn build_registry(
    config: &EngineConfig,
    settings: ExpansionSettings,
    extra: &[PathBuf],
) -> CliResult<ExpansionRegistry> {
    let mut sources = builtin_sources()?;

    for path in config.expansions.extra_sources.iter().chain(extra) {
        debug!("loading expansion source {}", path.display());
        sources.push(load_source_file(path)?);
    }

    Ok(ExpansionRegistry::from_sources(sources, settings))
}

/// Opens the settings store backed by the configured settings file and output
/// directory.
pub fn open_store(config: &EngineConfig, registry: &ExpansionRegistry) -> CliResult<FileSettingsStore> {
    let settings_file = config
        .settings_file()
        .map_err(|e| CliError::io(format!("Failed to resolve settings file: {e:#}")))?;
    let output_dir = config
        .output_dir()
        .map_err(|e| CliError::io(format!("Failed to resolve output directory: {e:#}")))?;

    let store = SettingsStore::open(
        JsonFilePersistence::new(settings_file),
        VariablesCssGenerator::new(output_dir, registry.settings()),
        registry.table().clone(),
    )?;
    Ok(store)
}

/// Builds the stylesheet set for lookups. Without explicit paths the
/// generated artifacts in the output directory are used.
pub fn stylesheet_set(config: &EngineConfig, paths: &[PathBuf]) -> CliResult<StylesheetSet> {
    let mut set = StylesheetSet::new(config.stylesheets.allow_list.clone());

    if paths.is_empty() {
        let output_dir = config
            .output_dir()
            .map_err(|e| CliError::io(format!("Failed to resolve output directory: {e:#}")))?;
        set.push(CssFile::new(output_dir.join(TOKENS_CSS_FILE)));
        set.push(CssFile::new(output_dir.join(EXPANSIONS_CSS_FILE)));
    } else {
        for path in paths {
            set.push(CssFile::new(path));
        }
    }

    Ok(set)
}

/// Reads a text file for a command.
pub fn read_input_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("Failed to read {}: {e}", path.display())))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInputReason;

    #[test]
    fn test_token_errors_map_to_exit_codes() {
        let invalid: CliError = TokenError::invalid_color("x", "bad").into();
        assert_eq!(invalid.exit_code, ExitCode::ValidationError);

        let cyclic: CliError = TokenError::CyclicExpansion {
            chain: vec!["@a".into(), "@a".into()],
        }
        .into();
        assert_eq!(cyclic.exit_code, ExitCode::ValidationError);

        let input: CliError = TokenError::InvalidInput {
            reason: InvalidInputReason::NotAMapping,
        }
        .into();
        assert_eq!(input.exit_code, ExitCode::ValidationError);

        let internal: CliError = TokenError::Persistence(anyhow::anyhow!("disk full")).into();
        assert_eq!(internal.exit_code, ExitCode::IoError);
        assert!(internal.message.contains("disk full"));
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::ValidationError.code(), 1);
        assert_eq!(ExitCode::IoError.code(), 2);
    }
}
