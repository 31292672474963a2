//! Macro expansion command.

use crate::cli::common::{
    build_registry, load_config, print_json, read_input_file, stylesheet_set, CliError, CliResult,
};
use crate::expansions::VariableLookup;
use clap::Args;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

/// Expand macros in CSS text
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Text to expand (reads --file or stdin when omitted)
    #[arg(value_name = "TEXT", conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Stylesheet consulted for unresolved macros (repeatable; defaults to the generated ones)
    #[arg(long = "stylesheet", value_name = "FILE")]
    stylesheets: Vec<PathBuf>,

    /// Look unresolved macros up in the stylesheets
    #[arg(long)]
    fallback: bool,

    /// Extra expansion source document (repeatable)
    #[arg(long = "source", value_name = "FILE")]
    sources: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct ExpandOutput {
    text: String,
    unresolved: Vec<String>,
}

impl ExpandArgs {
    /// Execute expand command
    pub fn execute(&self) -> CliResult<()> {
        let input = self.input()?;

        let config = load_config()?;
        let mut settings = config.expansion_settings();
        if self.fallback {
            settings.fallback_to_stylesheet = true;
        }

        let registry = build_registry(&config, settings, &self.sources)?;
        let stylesheets = stylesheet_set(&config, &self.stylesheets)?;
        let lookup: Option<&dyn VariableLookup> = settings
            .fallback_to_stylesheet
            .then_some(&stylesheets as &dyn VariableLookup);

        let output = registry.expand(&input, lookup)?;

        for token in &output.unresolved {
            eprintln!("warning: unresolved macro {token}");
        }

        if self.json {
            return print_json(&ExpandOutput {
                text: output.text,
                unresolved: output.unresolved,
            });
        }

        print!("{}", output.text);
        if !output.text.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    fn input(&self) -> CliResult<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return read_input_file(path);
        }

        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::io(format!("Failed to read stdin: {e}")))?;
        Ok(buffer)
    }
}
