//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and well-known file names.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Tokenkit";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "tokenkit";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "tokenkit";

/// Environment variable that overrides the config directory (used by tests).
pub const CONFIG_DIR_ENV: &str = "TOKENKIT_CONFIG_DIR";

/// Default file name of the persisted settings snapshot.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Default directory name for generated stylesheets.
pub const OUTPUT_DIR_NAME: &str = "css";

/// File name of the generated custom-property stylesheet.
pub const TOKENS_CSS_FILE: &str = "tokens.css";

/// File name of the generated utility-class stylesheet.
pub const EXPANSIONS_CSS_FILE: &str = "expansions.css";

/// Default macro start character.
pub const DEFAULT_START_CHARACTER: char = '@';

/// Stylesheet identifier prefixes trusted for introspection by default.
pub const DEFAULT_STYLESHEET_ALLOW_LIST: &[&str] = &["tokens", "expansions", "tokenkit"];
