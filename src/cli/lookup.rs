//! Stylesheet lookup commands.

use crate::cli::common::{load_config, print_json, stylesheet_set, CliError, CliResult};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Look up generated CSS
#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(subcommand)]
    command: LookupCommand,
}

#[derive(Subcommand, Debug)]
enum LookupCommand {
    /// Print the rule text of a class
    Class(LookupTargetArgs),
    /// Print the value of a :root custom property
    Var(LookupTargetArgs),
}

/// Lookup target
#[derive(Args, Debug)]
pub struct LookupTargetArgs {
    /// Class or variable name
    #[arg(value_name = "NAME")]
    name: String,

    /// Stylesheet to search (repeatable; defaults to the generated ones)
    #[arg(long = "stylesheet", value_name = "FILE")]
    stylesheets: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct LookupOutput<'a> {
    name: &'a str,
    found: bool,
    text: Option<String>,
}

impl LookupArgs {
    /// Execute lookup subcommand
    pub fn execute(&self) -> CliResult<()> {
        let (args, is_class) = match &self.command {
            LookupCommand::Class(args) => (args, true),
            LookupCommand::Var(args) => (args, false),
        };

        let config = load_config()?;
        let set = stylesheet_set(&config, &args.stylesheets)?;
        let text = if is_class {
            set.find_class_rule(&args.name)
        } else {
            set.find_root_variable(&args.name)
        };

        if args.json {
            return print_json(&LookupOutput {
                name: &args.name,
                found: text.is_some(),
                text,
            });
        }

        match text {
            Some(text) => {
                println!("{text}");
                Ok(())
            }
            None => Err(CliError::validation(format!("'{}' not found", args.name))),
        }
    }
}
