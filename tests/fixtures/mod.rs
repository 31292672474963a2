//! Shared test fixtures for engine and CLI tests.
#![allow(dead_code)] // Each test binary uses a different subset

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tokenkit::models::SettingsSnapshot;

/// Builds a snapshot from `(key, value)` pairs.
pub fn snapshot(pairs: &[(&str, &str)]) -> SettingsSnapshot {
    pairs.iter().copied().collect()
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Expansion source whose two macros wrap each other.
pub fn cyclic_source_json() -> &'static str {
    r#"{
        "label": "Loop",
        "wrappers": { "wrap": "{{content}}" },
        "expansions": {
            "loop-a": { "wrapper": "wrap", "content": "@loop-b" },
            "loop-b": { "wrapper": "wrap", "content": "@loop-a" }
        }
    }"#
}

/// Expansion source redefining a built-in macro.
pub fn overriding_source_json() -> &'static str {
    r#"{
        "label": "Project",
        "expansions": { "gap-s": "gap: 0.75rem;", "card": "padding: 1rem;" }
    }"#
}

/// Generated-looking token stylesheet.
pub fn tokens_css() -> &'static str {
    "/* Generated by tokenkit. Do not edit. */\n\
     :root {\n  --color-primary: #336699;\n  --primary-h: 210;\n  --unknown-xyz: 10px;\n}\n\
     .btn { color: var(--color-primary); }\n"
}

/// Runs the `tokenkit` binary with an isolated config directory.
pub fn tokenkit(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tokenkit"))
        .env("TOKENKIT_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute tokenkit")
}

/// Stdout of a finished command.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished command.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parses stdout as JSON.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("Should parse JSON output")
}
