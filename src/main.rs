//! Tokenkit - design-token resolution and CSS macro expansion
//!
//! Derives color shades, keeps the settings snapshot and its generated
//! stylesheets in sync, expands `@macro` tokens in authored CSS and looks up
//! what the generated CSS actually contains.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenkit::cli::{
    CheatsheetArgs, CliResult, ConfigArgs, DeriveArgs, ExpandArgs, LookupArgs, SettingsArgs,
};

/// Tokenkit - design-token resolution and CSS macro expansion
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive a color value and its tonal variants
    Derive(DeriveArgs),
    /// Show or update stored settings
    Settings(SettingsArgs),
    /// Expand macros in CSS text
    Expand(ExpandArgs),
    /// Show the expansion cheatsheet
    Cheatsheet(CheatsheetArgs),
    /// Look up rules and variables in generated CSS
    Lookup(LookupArgs),
    /// Show or update configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli.command) {
        eprintln!("Error: {}", e.message);
        std::process::exit(e.exit_code.code());
    }
}

fn run(command: &Command) -> CliResult<()> {
    match command {
        Command::Derive(args) => args.execute(),
        Command::Settings(args) => args.execute(),
        Command::Expand(args) => args.execute(),
        Command::Cheatsheet(args) => args.execute(),
        Command::Lookup(args) => args.execute(),
        Command::Config(args) => args.execute(),
    }
}
