use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn semdex_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("semdex");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/semdex.db"

[chunking]
chunk_size = 64
chunk_overlap = 8

[retrieval]
default_top_k = 5

[embedding]
provider = "hash"
model = "feature-hash-v1"
dims = 256
"#,
        root.display()
    );

    let config_path = root.join("semdex.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_semdex(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = semdex_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run semdex binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_semdex(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/semdex.db").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_semdex(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_semdex(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_load_samples_inserts_five_documents() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    let (stdout, stderr, success) = run_semdex(&config_path, &["load-samples"]);
    assert!(
        success,
        "load-samples failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("loaded 5 sample documents"));

    let (stdout, _, success) = run_semdex(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Documents:       5"));
}

#[test]
fn test_add_document_shows_in_stats() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    let (stdout, stderr, success) = run_semdex(
        &config_path,
        &[
            "add",
            "Release Notes",
            "the quick brown fox jumps over the lazy dog",
            "--file-type",
            "text",
        ],
    );
    assert!(success, "add failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("added "));

    let (stdout, _, success) = run_semdex(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Documents:       1"));
    assert!(stdout.contains("Words:           9"));
    assert!(stdout.contains("text"));
}

#[test]
fn test_search_finds_relevant_document() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    run_semdex(&config_path, &["load-samples"]);

    let (stdout, stderr, success) =
        run_semdex(&config_path, &["search", "machine learning", "--top-k", "3"]);
    assert!(
        success,
        "search failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("Machine Learning and Deep Learning"));
}

#[test]
fn test_search_empty_store_soft_fails() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    let (stdout, stderr, success) = run_semdex(&config_path, &["search", "anything"]);
    assert!(success, "soft policy should not exit non-zero");
    assert!(stdout.contains("No results."));
    assert!(stderr.contains("Warning"));
}

#[test]
fn test_search_empty_store_strict_policy_errors() {
    let (_tmp, config_path) = setup_test_env();

    // Rewrite the config with the strict unindexed policy.
    let content = fs::read_to_string(&config_path).unwrap();
    fs::write(
        &config_path,
        content.replace(
            "[retrieval]\ndefault_top_k = 5",
            "[retrieval]\ndefault_top_k = 5\nunindexed = \"error\"",
        ),
    )
    .unwrap();

    run_semdex(&config_path, &["init"]);
    let (_, stderr, success) = run_semdex(&config_path, &["search", "anything"]);
    assert!(!success, "strict policy should exit non-zero");
    assert!(stderr.contains("index not built"));
}

#[test]
fn test_demo_runs_batch_queries_and_analytics() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    let (stdout, stderr, success) = run_semdex(&config_path, &["demo"]);
    assert!(success, "demo failed: stdout={}, stderr={}", stdout, stderr);

    assert!(stdout.contains("loaded 5 sample documents"));
    assert!(stdout.contains("query: \"machine learning and neural networks\""));
    assert!(stdout.contains("Searches:        5"));
    assert!(stdout.contains("Recent queries:"));
}

#[test]
fn test_stats_on_fresh_database() {
    let (_tmp, config_path) = setup_test_env();

    run_semdex(&config_path, &["init"]);
    let (stdout, _, success) = run_semdex(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Documents:       0"));
    assert!(stdout.contains("Searches:        0"));
}

#[test]
fn test_selftest_passes() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_semdex(&config_path, &["selftest"]);
    assert!(
        success,
        "selftest failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("all checks passed"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("does-not-exist.toml");

    let (_, stderr, success) = run_semdex(&config_path, &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
