//! Integration tests for the bdn CLI
//!
//! These tests invoke the actual bdn binary and verify:
//! - Exit codes (0 = success, 1 = invalid document, 2 = I/O or usage error)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn bdn_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bdn"))
}

fn fixture_valid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/conformance/valid/{}", name))
}

fn fixture_invalid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/conformance/invalid/{}", name))
}

fn run_bdn(args: &[&str]) -> std::process::Output {
    Command::new(bdn_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to execute bdn")
}

fn path(buf: &PathBuf) -> &str {
    buf.to_str().unwrap()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_bdn(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bdn"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_flag() {
    let output = run_bdn(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let output = run_bdn(&["transmogrify"]);
    assert_eq!(output.status.code(), Some(2));
}

// ── Validate ──────────────────────────────────────────────

#[test]
fn test_validate_valid_document() {
    let output = run_bdn(&["validate", path(&fixture_valid("elements.bdn"))]);
    assert!(output.status.success(), "valid document should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"));
}

#[test]
fn test_validate_invalid_document() {
    let output = run_bdn(&["validate", path(&fixture_invalid("unclosed-list.bdn"))]);
    assert_eq!(output.status.code(), Some(1), "invalid document should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
    assert!(stderr.contains("Syntax error"));
}

#[test]
fn test_validate_nonexistent_file() {
    let output = run_bdn(&["validate", "nonexistent.bdn"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
}

#[test]
fn test_validate_json_output() {
    let output = run_bdn(&["validate", "--json", path(&fixture_valid("strings.bdn"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], 0);
}

#[test]
fn test_validate_json_invalid() {
    let output = run_bdn(&["validate", "--json", path(&fixture_invalid("tab-character.bdn"))]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["line"], 1);
    assert_eq!(json["column"], 4);
}

#[test]
fn test_validate_quiet_valid() {
    let output = run_bdn(&["--quiet", "validate", path(&fixture_valid("notes.bdn"))]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "quiet mode should produce no stdout");
}

// ── Format ────────────────────────────────────────────────

#[test]
fn test_format_reproduces_canonical_fixture() {
    let fixture = fixture_valid("collections.bdn");
    let output = run_bdn(&["format", path(&fixture)]);
    assert!(output.status.success(), "format should exit 0");
    let expected = std::fs::read_to_string(&fixture).unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

#[test]
fn test_format_idempotent() {
    let temp = std::env::temp_dir().join("bdn_test_format_idempotent.bdn");
    std::fs::write(&temp, "[1, 2, [$a: ~-π]]  ! messy\n").expect("write temp");

    let first = run_bdn(&["format", temp.to_str().unwrap()]);
    assert!(first.status.success());
    let canonical1 = String::from_utf8_lossy(&first.stdout).to_string();

    std::fs::write(&temp, &canonical1).expect("write temp");
    let second = run_bdn(&["format", temp.to_str().unwrap()]);
    let canonical2 = String::from_utf8_lossy(&second.stdout).to_string();

    assert_eq!(canonical1, canonical2, "format must be idempotent");
    assert!(canonical1.contains("$a: ~π"));
    let _ = std::fs::remove_file(&temp);
}

#[test]
fn test_format_indent_and_depth_flags() {
    let fixture = fixture_valid("notes.bdn");
    let output = run_bdn(&["format", "--indent", "2", path(&fixture)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\n  $alpha: 1  ! first\n"));

    let output = run_bdn(&["format", "--max-depth", "0", path(&fixture)]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "...\n");
}

#[test]
fn test_format_invalid_document() {
    let output = run_bdn(&["format", path(&fixture_invalid("missing-eol.bdn"))]);
    assert_eq!(output.status.code(), Some(1));
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_valid_document() {
    let output = run_bdn(&["hash", path(&fixture_valid("procedure.bdn"))]);
    assert!(output.status.success(), "hash should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(stdout.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(stdout.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_ignores_layout() {
    let temp = std::env::temp_dir().join("bdn_test_hash_layout.bdn");
    std::fs::write(&temp, "{$x := 5; return $x}\n").expect("write temp");
    let compact = run_bdn(&["hash", temp.to_str().unwrap()]);
    let canonical = run_bdn(&["hash", path(&fixture_valid("procedure.bdn"))]);
    assert_eq!(compact.stdout, canonical.stdout);
    let _ = std::fs::remove_file(&temp);
}

#[test]
fn test_hash_determinism() {
    let fixture = fixture_valid("elements.bdn");
    let first = run_bdn(&["hash", path(&fixture)]);
    for _ in 0..10 {
        let output = run_bdn(&["hash", path(&fixture)]);
        assert_eq!(first.stdout, output.stdout, "hash must be deterministic");
    }
}
