mod common;

use bucketflame::commands::{analyze_value, execute_analyze, validate_args, AnalyzeArgs};
use bucketflame::output::read_summary;
use common::{profile_json, thread_json, RULES_TOML};
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};

fn write_profile(dir: &TempDir) -> String {
    let profile = profile_json(vec![
        thread_json("GeckoMain", &[&["main", "Interpret"], &["main", "f"]]),
        thread_json("Compositor", &[&["g"]]),
    ]);
    let path = dir.path().join("profile.json");
    std::fs::write(&path, profile.to_string()).unwrap();
    path.to_string_lossy().into_owned()
}

fn write_rules(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("rules.toml");
    std::fs::write(&path, RULES_TOML).unwrap();
    path
}

#[test]
fn test_validate_args_valid() {
    let dir = TempDir::new().unwrap();
    let args = AnalyzeArgs {
        input: write_profile(&dir),
        ..Default::default()
    };
    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_input() {
    assert!(validate_args(&AnalyzeArgs::default()).is_err());
}

#[test]
fn test_validate_args_missing_file() {
    let args = AnalyzeArgs {
        input: "/nonexistent/profile.json".to_string(),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_url_input_skips_file_check() {
    let args = AnalyzeArgs {
        input: "https://example.com/profile.json".to_string(),
        ..Default::default()
    };
    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_bad_symbol_server() {
    let args = AnalyzeArgs {
        input: "https://example.com/profile.json".to_string(),
        symbol_server: Some("ftp://symbols".to_string()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_symbols_dir_must_exist() {
    let args = AnalyzeArgs {
        input: "https://example.com/profile.json".to_string(),
        symbols_dir: Some("/nonexistent/symbols".into()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_value_with_rule_file() {
    let dir = TempDir::new().unwrap();
    let args = AnalyzeArgs {
        rules: Some(write_rules(&dir)),
        ..Default::default()
    };
    let profile = profile_json(vec![thread_json("GeckoMain", &[&["main", "Interpret"]])]);

    let summary = analyze_value(&profile, &args).unwrap();
    assert_eq!(summary.categories, vec!["*", "js", "paint", "fg"]);
    assert_eq!(summary.threads[0].buckets[1].category, "js");
    assert_eq!(summary.threads[0].buckets[1].top_weight, 1);
}

#[test]
fn test_analyze_value_rejects_malformed_profile() {
    let args = AnalyzeArgs::default();
    assert!(analyze_value(&json!({ "threads": [] }), &args).is_err());
}

#[test]
fn test_execute_analyze_writes_summary() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("summary.json");
    let args = AnalyzeArgs {
        input: write_profile(&dir),
        output: output.clone(),
        rules: Some(write_rules(&dir)),
        thread: Some("GeckoMain".to_string()),
        ..Default::default()
    };

    execute_analyze(args).unwrap();

    let summary = read_summary(&output).unwrap();
    assert_eq!(summary.threads.len(), 1);
    assert_eq!(summary.threads[0].name, "GeckoMain");
    assert_eq!(summary.threads[0].total_weight, 2);
}

#[test]
fn test_execute_analyze_invalid_json() {
    let dir = TempDir::new().unwrap();
    let input = NamedTempFile::new_in(dir.path()).unwrap();
    std::fs::write(input.path(), "not json").unwrap();

    let args = AnalyzeArgs {
        input: input.path().to_string_lossy().into_owned(),
        output: dir.path().join("summary.json"),
        ..Default::default()
    };
    assert!(execute_analyze(args).is_err());
}
