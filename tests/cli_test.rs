//! CLI contract tests
//!
//! Runs the compiled binary with AI scoring disabled and checks output
//! formats, exit codes and the init command.

use std::path::{Path, PathBuf};
use std::process::Command;

fn md_audit_bin() -> String {
    env!("CARGO_BIN_EXE_md-audit").to_string()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Run md-audit in `cwd` and return (stdout, stderr, exit_code)
fn run(cwd: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(md_audit_bin())
        .args(args)
        .current_dir(cwd)
        .env("MD_AUDIT_ENABLE_AI", "false")
        .env_remove("MD_AUDIT_LLM_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute md-audit binary");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn analyze(args: &[&str]) -> (String, String, i32) {
    let cwd = tempfile::tempdir().unwrap();
    let mut full = vec!["--log-level", "error", "analyze"];
    full.extend(args);
    run(cwd.path(), &full)
}

#[test]
fn test_json_output_is_valid() {
    let path = fixture("high_quality.md");
    let (stdout, stderr, code) = analyze(&[path.to_str().unwrap(), "-f", "json", "-k", "rust", "--no-ai"]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");
    assert_eq!(json["total_score"], 75.0);
    assert_eq!(json["metadata_score"], 30.0);
    assert!(json["findings"].as_array().is_some_and(|f| !f.is_empty()));
    assert!(json["ai_analysis"].is_null());
}

#[test]
fn test_markdown_output() {
    let path = fixture("medium_quality.md");
    let (stdout, _, code) = analyze(&[path.to_str().unwrap(), "--format", "md", "--no-ai"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("# SEO Audit Report"));
    assert!(stdout.contains("## Score Breakdown"));
    assert!(stdout.contains("## Diagnostics"));
    assert!(!stdout.contains("## AI Semantic Analysis"));
}

#[test]
fn test_text_output() {
    let path = fixture("low_quality.md");
    let (stdout, _, code) = analyze(&[path.to_str().unwrap(), "--no-ai"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SEO Audit"));
    assert!(stdout.contains("title_exists"));
}

#[test]
fn test_empty_directory_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = analyze(&[dir.path().to_str().unwrap(), "-f", "json"]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");
    assert_eq!(json["total_files"], 0);
    assert_eq!(json["reports"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_directory_batch_json() {
    let dir = fixture("");
    let (stdout, stderr, code) =
        analyze(&[dir.to_str().unwrap(), "-f", "json", "--no-progress", "--workers", "2"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stderr.contains("Analyzed 3/3"));

    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");
    assert_eq!(json["total_files"], 3);
    assert_eq!(json["reports"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_fail_under() {
    let low = fixture("low_quality.md");
    let (_, stderr, code) = analyze(&[low.to_str().unwrap(), "--fail-under", "90"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--fail-under"));

    let high = fixture("high_quality.md");
    let (_, _, code) = analyze(&[high.to_str().unwrap(), "-k", "rust", "--fail-under", "50"]);
    assert_eq!(code, 0);
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.md");
    let path = fixture("high_quality.md");
    let (stdout, _, code) = analyze(&[
        path.to_str().unwrap(),
        "-f",
        "markdown",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# SEO Audit Report"));
}

#[test]
fn test_too_many_keywords_rejected() {
    let path = fixture("high_quality.md");
    let path = path.to_str().unwrap();
    let mut args = vec![path];
    for _ in 0..11 {
        args.extend(["-k", "rust"]);
    }
    let (_, stderr, code) = analyze(&args);
    assert_ne!(code, 0);
    assert!(stderr.contains("At most 10 keywords"));
}

#[test]
fn test_missing_path_fails() {
    let (_, stderr, code) = analyze(&["/nonexistent/post.md"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Path does not exist"));
}

#[test]
fn test_invalid_workers_rejected() {
    let (_, stderr, code) = analyze(&[".", "--workers", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("workers must be at least 1"));
}

#[test]
fn test_init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Created"));

    let written = std::fs::read_to_string(dir.path().join("md-audit.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["title_rules"]["min_length"], 30);
    assert_eq!(json["llm_api_key"], "");

    let (stdout, _, code) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("already exists"));
}

#[test]
fn test_summary_only_directory_run() {
    let dir = fixture("");
    let (stdout, _, code) = analyze(&[dir.to_str().unwrap(), "-f", "md", "--summary-only"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("# SEO Audit Summary"));
    assert!(stdout.contains("**Files analyzed**: 3/3"));
    assert!(!stdout.contains("# SEO Audit Report"));
}
