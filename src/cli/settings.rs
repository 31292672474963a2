//! Settings store commands.

use crate::cli::common::{
    build_registry, load_config, open_store, print_json, CliError, CliResult, FileSettingsStore,
};
use crate::error::{Feedback, TokenError};
use crate::models::SettingsSnapshot;
use crate::parser;
use crate::services::{UpdateOptions, UpdateReport};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Settings store commands
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Display stored settings
    Show(SettingsShowArgs),
    /// Set one or more settings
    Set(SettingsSetArgs),
    /// Apply a patch document (.json, .json5, .yaml, .yml, .toml)
    Apply(SettingsApplyArgs),
}

/// Display stored settings
#[derive(Args, Debug)]
pub struct SettingsShowArgs {
    /// Show a single setting
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set one or more settings
#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    /// Settings as KEY=VALUE
    #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_assignment)]
    entries: Vec<(String, String)>,

    /// Skip stylesheet regeneration
    #[arg(long)]
    no_regenerate: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Apply a patch document
#[derive(Args, Debug)]
pub struct SettingsApplyArgs {
    /// Patch document
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Skip stylesheet regeneration
    #[arg(long)]
    no_regenerate: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct UpdateOutput<'a> {
    changed: bool,
    generated_count: usize,
    saved: &'a SettingsSnapshot,
}

impl SettingsArgs {
    /// Execute settings subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            SettingsCommand::Show(args) => args.execute(),
            SettingsCommand::Set(args) => args.execute(),
            SettingsCommand::Apply(args) => args.execute(),
        }
    }
}

impl SettingsShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let store = store()?;

        if let Some(key) = &self.key {
            let value = store
                .get(key)
                .ok_or_else(|| CliError::validation(format!("Setting '{key}' is not set")))?;
            if self.json {
                return print_json(&serde_json::json!({ key: value }));
            }
            println!("{value}");
            return Ok(());
        }

        let snapshot = store.get_all();
        if self.json {
            return print_json(&snapshot);
        }

        if snapshot.is_empty() {
            println!("No settings stored.");
        }
        for (key, value) in snapshot.iter() {
            println!("{key} = {value}");
        }
        Ok(())
    }
}

impl SettingsSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let entries: SettingsSnapshot = self.entries.iter().cloned().collect();
        let options = UpdateOptions {
            regenerate: !self.no_regenerate,
        };

        let store = store()?;
        report(store.update(&entries, options), self.json)
    }
}

impl SettingsApplyArgs {
    /// Execute apply command
    pub fn execute(&self) -> CliResult<()> {
        let patch = parser::load_patch(&self.file).map_err(|e| {
            if self.file.exists() {
                CliError::validation(format!("{e:#}"))
            } else {
                CliError::io(format!("{e:#}"))
            }
        })?;
        let options = UpdateOptions {
            regenerate: !self.no_regenerate,
        };

        let store = store()?;
        report(store.update_json(&patch, options), self.json)
    }
}

fn store() -> CliResult<FileSettingsStore> {
    let config = load_config()?;
    let registry = build_registry(&config, config.expansion_settings(), &[])?;
    open_store(&config, &registry)
}

/// Prints the outcome of an update. "Nothing to do" is not a failure.
fn report(result: Result<UpdateReport, TokenError>, json: bool) -> CliResult<()> {
    let report = match result {
        Ok(report) => report,
        Err(e) if e.feedback() == Feedback::NothingToDo => {
            println!("Nothing to update: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&UpdateOutput {
            changed: report.changed,
            generated_count: report.generated_count,
            saved: &report.saved,
        });
    }

    if report.changed {
        println!(
            "Saved {} settings, regenerated {} file(s).",
            report.saved.len(),
            report.generated_count
        );
    } else {
        println!("Settings unchanged.");
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("color-primary=#336699"),
            Ok(("color-primary".to_string(), "#336699".to_string()))
        );
        assert_eq!(
            parse_assignment("font = a=b"),
            Ok(("font".to_string(), "a=b".to_string()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }
}
