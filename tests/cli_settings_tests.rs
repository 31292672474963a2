//! End-to-end tests for `tokenkit settings`.
//!
//! Every command runs against its own temporary config directory.

mod fixtures;
use fixtures::*;

use tempfile::TempDir;

#[test]
fn test_settings_set_backfills_and_generates() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path();

    let output = tokenkit(config_dir, &["settings", "set", "color-primary=#ff0000", "space-m=1rem"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("regenerated 2 file(s)"));

    assert!(config_dir.join("settings.json").exists());
    let tokens = std::fs::read_to_string(config_dir.join("css").join("tokens.css")).unwrap();
    assert!(tokens.contains("--primary-h: 0;"));

    let output = tokenkit(config_dir, &["settings", "show", "--json"]);
    let result = stdout_json(&output);
    assert_eq!(result["primary-dark-s"], "100");
    assert_eq!(result["space-m"], "1rem");

    let output = tokenkit(config_dir, &["settings", "show", "--key", "space-m"]);
    assert_eq!(stdout(&output).trim(), "1rem");
}

#[test]
fn test_settings_set_twice_is_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path();

    let first = tokenkit(config_dir, &["settings", "set", "space-m=1rem", "--json"]);
    assert_eq!(stdout_json(&first)["changed"], true);

    let second = tokenkit(config_dir, &["settings", "set", "space-m=1rem", "--json"]);
    let result = stdout_json(&second);
    assert_eq!(result["changed"], false);
    assert_eq!(result["generated_count"], 0);
}

#[test]
fn test_settings_set_no_regenerate() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path();

    let output = tokenkit(config_dir, &["settings", "set", "space-m=1rem", "--no-regenerate"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!config_dir.join("css").join("tokens.css").exists());
}

#[test]
fn test_settings_set_invalid_color_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path();

    let output = tokenkit(config_dir, &["settings", "set", "color-primary=#nothex"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("color-primary"));
    assert!(!config_dir.join("settings.json").exists());
}

#[test]
fn test_settings_show_missing_key_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["settings", "show", "--key", "nope"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_settings_apply_patch_formats() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    let yaml = write_file(
        temp_dir.path(),
        "patch.yaml",
        "color-accent: \"#00ff00\"\noption-sticky: true\ncolumns: 12\n",
    );

    let output = tokenkit(&config_dir, &["settings", "apply", yaml.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result = stdout_json(&tokenkit(&config_dir, &["settings", "show", "--json"]));
    assert_eq!(result["option-sticky"], "on");
    assert_eq!(result["columns"], "12");
    assert_eq!(result["accent-comp-s"], "100");
}

#[test]
fn test_settings_apply_empty_is_nothing_to_do() {
    let temp_dir = TempDir::new().unwrap();
    let patch = write_file(temp_dir.path(), "empty.json", "{}");

    let output = tokenkit(temp_dir.path(), &["settings", "apply", patch.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Nothing to update"));
}

#[test]
fn test_settings_apply_non_mapping_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let patch = write_file(temp_dir.path(), "list.json", "[\"a\", \"b\"]");

    let output = tokenkit(temp_dir.path(), &["settings", "apply", patch.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_settings_apply_missing_file_exits_2() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let output = tokenkit(temp_dir.path(), &["settings", "apply", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}
