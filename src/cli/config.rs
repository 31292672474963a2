//! Configuration management CLI commands.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::config::EngineConfig;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Macro start character
    #[arg(long, value_name = "CHAR")]
    start_character: Option<String>,

    /// Stylesheet fallback for unresolved macros (on or off)
    #[arg(long, value_name = "on|off")]
    fallback: Option<String>,

    /// Settings document path
    #[arg(long, value_name = "FILE")]
    settings_file: Option<PathBuf>,

    /// Generated stylesheet directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Add an expansion source document (repeatable)
    #[arg(long = "add-source", value_name = "FILE")]
    add_sources: Vec<PathBuf>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    expansions: ExpansionsOutput,
    paths: PathsOutput,
    stylesheets: StylesheetsOutput,
}

#[derive(Serialize, Debug)]
struct ExpansionsOutput {
    start_character: String,
    fallback_to_stylesheet: bool,
    extra_sources: Vec<String>,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    settings_file: String,
    output_dir: String,
}

#[derive(Serialize, Debug)]
struct StylesheetsOutput {
    allow_list: Vec<String>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let output = describe(&config)?;

        if self.json {
            return print_json(&output);
        }

        println!("Config file: {}", output.config_file);
        println!();
        println!("[expansions]");
        println!("  start_character        = {}", output.expansions.start_character);
        println!(
            "  fallback_to_stylesheet = {}",
            output.expansions.fallback_to_stylesheet
        );
        for source in &output.expansions.extra_sources {
            println!("  extra source           = {source}");
        }
        println!("[paths]");
        println!("  settings_file          = {}", output.paths.settings_file);
        println!("  output_dir             = {}", output.paths.output_dir);
        println!("[stylesheets]");
        println!(
            "  allow_list             = {}",
            output.stylesheets.allow_list.join(", ")
        );

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.start_character.is_none()
            && self.fallback.is_none()
            && self.settings_file.is_none()
            && self.output_dir.is_none()
            && self.add_sources.is_empty()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --start-character, --fallback, --settings-file, --output-dir, or --add-source",
            ));
        }

        let mut config = load_config()?;

        if let Some(start) = &self.start_character {
            config
                .set_start_character(start)
                .map_err(|e| CliError::validation(format!("{e:#}")))?;
        }

        if let Some(fallback) = &self.fallback {
            config.expansions.fallback_to_stylesheet = match fallback.to_lowercase().as_str() {
                "on" | "true" => true,
                "off" | "false" => false,
                _ => {
                    return Err(CliError::validation(
                        "Invalid fallback value. Must be 'on' or 'off'",
                    ))
                }
            };
        }

        if let Some(path) = &self.settings_file {
            config.paths.settings_file = Some(path.clone());
        }

        if let Some(path) = &self.output_dir {
            config.paths.output_dir = Some(path.clone());
        }

        for source in &self.add_sources {
            if !source.exists() {
                return Err(CliError::validation(format!(
                    "Expansion source does not exist: {}",
                    source.display()
                )));
            }
            if !config.expansions.extra_sources.contains(source) {
                config.expansions.extra_sources.push(source.clone());
            }
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

fn describe(config: &EngineConfig) -> CliResult<ConfigOutput> {
    let resolve = |result: anyhow::Result<PathBuf>| {
        result
            .map(|path| path.to_string_lossy().to_string())
            .map_err(|e| CliError::io(format!("Failed to resolve path: {e:#}")))
    };

    Ok(ConfigOutput {
        config_file: resolve(EngineConfig::config_file_path())?,
        expansions: ExpansionsOutput {
            start_character: config.expansions.start_character.clone(),
            fallback_to_stylesheet: config.expansions.fallback_to_stylesheet,
            extra_sources: config
                .expansions
                .extra_sources
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
        },
        paths: PathsOutput {
            settings_file: resolve(config.settings_file())?,
            output_dir: resolve(config.output_dir())?,
        },
        stylesheets: StylesheetsOutput {
            allow_list: config.stylesheets.allow_list.clone(),
        },
    })
}
