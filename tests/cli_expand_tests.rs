//! End-to-end tests for `tokenkit expand`.
//!
//! Every command runs against its own temporary config directory.

mod fixtures;
use fixtures::*;

use tempfile::TempDir;

#[test]
fn test_expand_builtin_macro() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["expand", "div{ @gap-s }"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "div{ gap: var(--space-s); }\n");
}

#[test]
fn test_expand_unresolved_warns() {
    let temp_dir = TempDir::new().unwrap();
    let output = tokenkit(temp_dir.path(), &["expand", "@unknown-xyz", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let result = stdout_json(&output);
    assert_eq!(result["text"], "@unknown-xyz");
    assert_eq!(result["unresolved"][0], "@unknown-xyz");
    assert!(stderr(&output).contains("unresolved macro @unknown-xyz"));
}

#[test]
fn test_expand_fallback_to_stylesheet() {
    let temp_dir = TempDir::new().unwrap();
    let sheet = write_file(temp_dir.path(), "tokens.css", tokens_css());

    let output = tokenkit(
        temp_dir.path(),
        &[
            "expand",
            "@unknown-xyz",
            "--fallback",
            "--stylesheet",
            sheet.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "10px;\n");
}

#[test]
fn test_expand_fallback_ignores_sheets_off_the_allow_list() {
    let temp_dir = TempDir::new().unwrap();
    let sheet = write_file(temp_dir.path(), "vendor.css", tokens_css());

    let output = tokenkit(
        temp_dir.path(),
        &[
            "expand",
            "@unknown-xyz",
            "--fallback",
            "--stylesheet",
            sheet.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "@unknown-xyz\n");
}

#[test]
fn test_expand_from_file_with_extra_source() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_file(temp_dir.path(), "project.json", overriding_source_json());
    let input = write_file(temp_dir.path(), "input.css", ".card { @card @gap-s }\n");

    let output = tokenkit(
        temp_dir.path(),
        &[
            "expand",
            "--file",
            input.to_str().unwrap(),
            "--source",
            source.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), ".card { padding: 1rem; gap: 0.75rem; }\n");
}

#[test]
fn test_expand_cycle_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_file(temp_dir.path(), "loop.json", cyclic_source_json());

    let output = tokenkit(
        temp_dir.path(),
        &["expand", "@loop-a", "--source", source.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cyclic expansion"));
}
