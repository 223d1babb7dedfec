//! Integration tests running the compiled `pdf-fts` binary.

use pdf_fts::index::{ContentStore, Fingerprint};
use std::path::Path;
use std::process::{Command, Output};

/// Run the binary in `dir` with an isolated config directory
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdf-fts"))
        .args(args)
        .current_dir(dir)
        .env("XDG_DATA_HOME", dir.join(".data"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run pdf-fts")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Store with one two-page document, written through the library
fn prepare_store(dir: &Path) {
    let mut store = ContentStore::open(&dir.join("fts.db")).unwrap();
    store
        .upsert_document(
            "papers/doc.pdf",
            &Fingerprint::from_hex("0123456789abcdef0123456789abcdef01234567"),
            &["foo bar".to_string(), "baz qux".to_string()],
        )
        .unwrap();
}

#[test]
fn test_search_without_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["search", "anything"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("scan"), "stderr: {}", stderr(&output));
}

#[test]
fn test_rebuild_without_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["rebuild-fts"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("fts.db").exists());
}

#[test]
fn test_scan_empty_directory_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["scan"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No PDF files found."));
    assert!(dir.path().join("fts.db").exists());
}

#[test]
fn test_search_prints_grouped_results() {
    let dir = tempfile::tempdir().unwrap();
    prepare_store(dir.path());

    let output = run(dir.path(), &["search", "bar"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Search Results for 'bar'"));
    assert!(text.contains("doc.pdf"));
    assert!(text.contains("papers"));
    assert!(text.contains("p.1"));
    assert!(!text.contains("p.2"));
    assert!(text.contains("Found 1 result(s)."));
    // Not a terminal, so no colour and no raw markers
    assert!(!text.contains("\x1b["));
    assert!(!text.contains("[HL]"));
}

#[test]
fn test_search_found_from_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    prepare_store(dir.path());
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let output = run(&nested, &["search", "qux", "--limit", "1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("p.2"));
}

#[test]
fn test_search_no_results_and_bad_syntax() {
    let dir = tempfile::tempdir().unwrap();
    prepare_store(dir.path());

    let output = run(dir.path(), &["search", "absent"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No results found."));

    let output = run(dir.path(), &["search", "\"unterminated"]);
    assert!(!output.status.success());
}

#[test]
fn test_rebuild_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    prepare_store(dir.path());

    let output = run(dir.path(), &["rebuild-fts"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(2 entries)"));

    let output = run(dir.path(), &["stats"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Pages:            2"));
    assert!(text.contains("in sync"));
    assert!(text.contains("Documents no longer on disk: 1"));
}

#[test]
fn test_config_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["config"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("\"db_file_name\": \"fts.db\""));
    assert!(text.contains("\"live_limit\": 20"));
}
