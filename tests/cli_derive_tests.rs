//! End-to-end tests for `tokenkit derive`.
//!
//! Every command runs against its own temporary config directory.

mod fixtures;
use fixtures::*;

use tempfile::TempDir;

#[test]
fn test_derive_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["derive", "#336699", "--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result = stdout_json(&output);
    assert_eq!(result["value"]["hex"], "#336699");
    assert_eq!(result["value"]["h"], 210);
    assert_eq!(result["value"]["s_perc"], "50%");
    assert_eq!(result["variants"].as_array().map(Vec::len), Some(7));
    assert_eq!(result["variants"][0]["modifier"], "ultra-light");
    assert_eq!(result["variants"][0]["l"], 95);
}

#[test]
fn test_derive_human_readable() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["derive", "rgb(255, 0, 0)"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("hex: #ff0000"));
    assert!(text.contains("hsl: hsl(0, 100%, 50%)"));
    assert!(text.contains("comp"));
}

#[test]
fn test_derive_invalid_color_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["derive", "banana"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("banana"));
}
