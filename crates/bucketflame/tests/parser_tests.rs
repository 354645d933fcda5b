mod common;

use bucketflame::aggregator::resolve_call_stack;
use bucketflame::parser::{parse_profile, skip_intervals, to_summary};
use bucketflame::rules::RuleSet;
use common::{profile_json, thread_json};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_parse_profile_meta_and_libs() {
    let mut profile = profile_json(vec![thread_json("GeckoMain", &[&["main"]])]);
    profile["libs"] = json!([{
        "name": "xul.dll",
        "debugName": "xul.pdb",
        "breakpadId": "ABCD1",
        "path": "C:\\firefox\\xul.dll"
    }]);

    let parsed = parse_profile(&profile).unwrap();
    assert_eq!(parsed.meta.interval, 1.0);
    assert_eq!(parsed.meta.url.as_deref(), Some("https://example.com/"));
    assert_eq!(parsed.libs.len(), 1);
    assert_eq!(parsed.libs[0].debug_name(), "xul.pdb");
    assert_eq!(parsed.libs[0].debug_id.as_deref(), Some("ABCD1"));
    assert_eq!(parsed.threads[0].name, "GeckoMain");
}

#[test]
fn test_call_stacks_resolve_leaf_to_root() {
    let profile = profile_json(vec![thread_json(
        "GeckoMain",
        &[&["main", "js::RunScript", "Interpret"], &["main"]],
    )]);
    let parsed = parse_profile(&profile).unwrap();
    let thread = parsed.threads[0].profile.as_ref().unwrap();

    let first = resolve_call_stack(thread, thread.samples[0].stack).unwrap();
    assert_eq!(first, vec!["Interpret", "js::RunScript", "main"]);
    let second = resolve_call_stack(thread, thread.samples[1].stack).unwrap();
    assert_eq!(second, vec!["main"]);
}

#[test]
fn test_idle_samples_resolve_empty() {
    let profile = profile_json(vec![thread_json("GeckoMain", &[&[], &["main"]])]);
    let parsed = parse_profile(&profile).unwrap();
    let thread = parsed.threads[0].profile.as_ref().unwrap();

    assert_eq!(thread.samples[0].stack, None);
    assert!(resolve_call_stack(thread, None).unwrap().is_empty());
}

#[test]
fn test_invalid_interval_is_rejected() {
    let mut profile = profile_json(vec![]);
    profile["meta"]["interval"] = json!(0.0);
    assert!(parse_profile(&profile).is_err());
}

#[test]
fn test_profile_without_threads() {
    let mut profile = profile_json(vec![]);
    profile.as_object_mut().unwrap().remove("threads");
    let parsed = parse_profile(&profile).unwrap();
    assert!(parsed.threads.is_empty());
}

#[test]
fn test_skip_uses_first_sample_time() {
    let mut profile = profile_json(vec![thread_json("GeckoMain", &[&["a"], &["b"], &["c"]])]);
    profile["meta"]["interval"] = json!(0.5);
    profile["meta"]["performance"] = json!({ "timing": { "unloadEventEnd": 1001.2 } });

    let parsed = parse_profile(&profile).unwrap();
    let thread = parsed.threads[0].profile.as_ref().unwrap();
    assert_eq!(skip_intervals(&parsed.meta, thread), 2);
}

#[test]
fn test_to_summary_carries_metadata() {
    let parsed = parse_profile(&profile_json(vec![])).unwrap();
    let rules = RuleSet::builtin().unwrap();
    let summary = to_summary(&parsed, Vec::new(), &rules);

    assert_eq!(summary.version, "1.0.0");
    assert_eq!(summary.url.as_deref(), Some("https://example.com/"));
    assert_eq!(summary.interval_ms, 1.0);
    assert_eq!(summary.categories[0], "*");
    assert!(summary.threads.is_empty());
}
