//! Expansion cheatsheet command.

use crate::cli::common::{build_registry, load_config, print_json, CliResult};
use crate::expansions::{CheatsheetNode, ExpansionEntry};
use clap::Args;
use std::path::PathBuf;

/// Show the expansion cheatsheet
#[derive(Args, Debug)]
pub struct CheatsheetArgs {
    /// Only show macros whose name contains this text
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Extra expansion source document (repeatable)
    #[arg(long = "source", value_name = "FILE")]
    sources: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl CheatsheetArgs {
    /// Execute cheatsheet command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let registry = build_registry(&config, config.expansion_settings(), &self.sources)?;
        let start = registry.settings().start_character;

        if let Some(query) = &self.search {
            let matches = registry.search(query);
            if self.json {
                return print_json(&matches);
            }
            if matches.is_empty() {
                println!("No expansions match '{query}'.");
            }
            for leaf in matches {
                print_leaf(leaf, start, "");
            }
            return Ok(());
        }

        let cheatsheet = registry.cheatsheet();
        if self.json {
            return print_json(cheatsheet);
        }

        println!("{}", cheatsheet.label);
        for category in &cheatsheet.children {
            println!("  {} ({})", category.label, category.children.len());
            for leaf in &category.children {
                print_leaf(leaf, start, "    ");
            }
        }

        for collision in registry.collisions() {
            eprintln!(
                "warning: '{}' from '{}' overrides '{}'",
                collision.name, collision.winner, collision.overridden
            );
        }

        Ok(())
    }
}

fn print_leaf(leaf: &CheatsheetNode, start: char, indent: &str) {
    let name = leaf.label.trim_start_matches(start);
    match &leaf.entry {
        Some(ExpansionEntry::Literal(css)) => println!("{indent}{start}{name:<20} {css}"),
        Some(ExpansionEntry::Wrapped(reference)) => {
            let slots: Vec<String> = reference
                .slots
                .iter()
                .map(|(slot, text)| format!("{slot}: {text}"))
                .collect();
            println!(
                "{indent}{start}{name:<20} [{}] {}",
                reference.wrapper,
                slots.join("; ")
            );
        }
        None => println!("{indent}{start}{name}"),
    }
}
