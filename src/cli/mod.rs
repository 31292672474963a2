//! CLI command handlers for Tokenkit.
//!
//! This module provides headless, scriptable access to the engine: color
//! derivation, settings updates, macro expansion and stylesheet lookups.

pub mod cheatsheet;
pub mod common;
pub mod config;
pub mod derive;
pub mod expand;
pub mod lookup;
pub mod settings;

// Re-export types used by main.rs and tests
pub use cheatsheet::CheatsheetArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use derive::DeriveArgs;
pub use expand::ExpandArgs;
pub use lookup::LookupArgs;
pub use settings::SettingsArgs;
