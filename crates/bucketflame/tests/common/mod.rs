//! Processed-profile fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;

/// Build a thread whose samples are given as call paths, outermost frame
/// first. An empty path is an idle sample.
pub fn thread_json(name: &str, samples: &[&[&str]]) -> Value {
    let mut strings: Vec<String> = Vec::new();
    let mut funcs: HashMap<String, usize> = HashMap::new();
    let mut func_names: Vec<usize> = Vec::new();
    let mut nodes: HashMap<(Option<usize>, usize), usize> = HashMap::new();
    let mut prefix: Vec<Value> = Vec::new();
    let mut frame: Vec<usize> = Vec::new();
    let mut sample_stacks: Vec<Value> = Vec::new();

    for path in samples {
        let mut parent: Option<usize> = None;
        for function in path.iter() {
            let func = *funcs.entry(function.to_string()).or_insert_with(|| {
                strings.push(function.to_string());
                func_names.push(strings.len() - 1);
                func_names.len() - 1
            });
            let node = *nodes.entry((parent, func)).or_insert_with(|| {
                prefix.push(parent.map_or(Value::Null, |p| json!(p)));
                frame.push(func);
                frame.len() - 1
            });
            parent = Some(node);
        }
        sample_stacks.push(parent.map_or(Value::Null, |p| json!(p)));
    }

    let times: Vec<f64> = (0..samples.len()).map(|i| i as f64).collect();
    let func_count = func_names.len();

    json!({
        "name": name,
        "samples": { "stack": sample_stacks, "time": times },
        "stackTable": { "prefix": prefix, "frame": frame },
        "frameTable": { "func": (0..func_count).collect::<Vec<_>>() },
        "funcTable": { "name": func_names },
        "stringArray": strings
    })
}

/// Wrap threads into a profile document with a 1 ms interval
pub fn profile_json(threads: Vec<Value>) -> Value {
    json!({
        "meta": {
            "startTime": 1000.0,
            "interval": 1.0,
            "url": "https://example.com/"
        },
        "libs": [],
        "threads": threads
    })
}

/// Rules used across tests
pub const RULES_TOML: &str = r#"
[[rule]]
pattern = "^Interpret"
bucket = "js:interpret"

[[rule]]
pattern = "^js::RunScript"
bucket = "js:run"

[[rule]]
pattern = "^PresShell::Paint"
bucket = "paint"

[[rule]]
pattern = "^(f|g)$"
bucket = "fg"
"#;
