//! Parser for processed Gecko profiles.
//!
//! Turns the raw profile JSON into per-thread arenas ([`ThreadProfile`]).
//! A thread whose tables are inconsistent is kept with its error so the
//! remaining threads can still be aggregated.

use super::schema::{Summary, ThreadSummary};
use super::thread::{
    CallStackTree, FuncTable, ResourceTable, Sample, StackNode, StringTable, ThreadProfile,
};
use crate::rules::RuleSet;
use crate::utils::config::{SCHEMA_VERSION, STRING_TABLE_FIELD_NAMES};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Profile-level metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMeta {
    /// Epoch milliseconds at which sample times start
    #[serde(default)]
    pub start_time: f64,

    /// Sampling interval in milliseconds
    #[serde(default = "default_interval")]
    pub interval: f64,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    /// Navigation timing captured alongside the profile
    #[serde(default)]
    pub performance: Option<PerformanceInfo>,
}

fn default_interval() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PerformanceInfo {
    #[serde(default)]
    pub timing: NavigationTiming,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    #[serde(default)]
    pub unload_event_end: Option<f64>,

    #[serde(default)]
    pub response_start: Option<f64>,
}

/// A shared library referenced by native functions
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub name: String,

    #[serde(default)]
    pub debug_name: Option<String>,

    #[serde(default, alias = "breakpadId")]
    pub debug_id: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub debug_path: Option<String>,
}

impl Library {
    /// Name used by symbol stores (falls back to the plain library name)
    pub fn debug_name(&self) -> &str {
        self.debug_name.as_deref().unwrap_or(&self.name)
    }
}

/// One thread of a parsed profile
#[derive(Debug)]
pub struct ThreadEntry {
    pub name: String,
    pub profile: Result<ThreadProfile, ParseError>,
}

/// Parsed profile: metadata, libraries and per-thread arenas
#[derive(Debug)]
pub struct ParsedProfile {
    pub meta: ProfileMeta,
    pub libs: Vec<Library>,
    pub threads: Vec<ThreadEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawThread {
    #[serde(default)]
    name: String,
    samples: RawSamples,
    stack_table: RawStackTable,
    frame_table: RawFrameTable,
    func_table: RawFuncTable,
    #[serde(default)]
    resource_table: RawResourceTable,
}

#[derive(Debug, Deserialize)]
struct RawSamples {
    stack: Vec<Option<i64>>,
    time: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawStackTable {
    prefix: Vec<Option<i64>>,
    frame: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawFrameTable {
    func: Vec<i64>,
    #[serde(default)]
    address: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct RawFuncTable {
    name: Vec<i64>,
    #[serde(default)]
    resource: Vec<Option<i64>>,
    #[serde(default)]
    address: Vec<Option<i64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResourceTable {
    #[serde(default)]
    lib: Vec<Option<i64>>,
    #[serde(default)]
    name: Vec<i64>,
}

/// Parse a processed profile document
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::InvalidFormat` - The document is not an object or lacks `meta`
/// * `ParseError::JsonError` - `meta` or `libs` have the wrong shape
///
/// Per-thread problems do not fail the whole profile; they are stored in
/// the corresponding [`ThreadEntry`].
pub fn parse_profile(raw: &serde_json::Value) -> Result<ParsedProfile, ParseError> {
    let obj = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Profile must be a JSON object".to_string())
    })?;

    let meta_value = obj
        .get("meta")
        .ok_or_else(|| ParseError::InvalidFormat("Missing 'meta' field".to_string()))?;
    let meta: ProfileMeta = serde_json::from_value(meta_value.clone())?;

    if !(meta.interval > 0.0) {
        return Err(ParseError::InvalidFormat(format!(
            "Sampling interval must be positive, found {}",
            meta.interval
        )));
    }

    let libs: Vec<Library> = match obj.get("libs") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => Vec::new(),
    };

    let threads_value = obj.get("threads").and_then(|t| t.as_array());
    let Some(threads_array) = threads_value else {
        warn!("No threads found in profile");
        return Ok(ParsedProfile {
            meta,
            libs,
            threads: Vec::new(),
        });
    };

    let threads = threads_array
        .iter()
        .enumerate()
        .map(|(index, value)| parse_thread_entry(index, value))
        .collect();

    Ok(ParsedProfile {
        meta,
        libs,
        threads,
    })
}

/// Parse one thread, capturing failures in the entry
///
/// **Private** - internal helper for parse_profile
fn parse_thread_entry(index: usize, value: &serde_json::Value) -> ThreadEntry {
    let fallback_name = value
        .get("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("thread-{}", index));

    let profile = parse_thread(value);
    match &profile {
        Ok(thread) => debug!(
            "Parsed thread '{}': {} samples, {} stack nodes, {} functions",
            thread.name,
            thread.samples.len(),
            thread.stack_tree.len(),
            thread.func_table.len()
        ),
        Err(e) => warn!("Failed to parse thread '{}': {}", fallback_name, e),
    }

    let name = match &profile {
        Ok(thread) if !thread.name.is_empty() => thread.name.clone(),
        _ => fallback_name,
    };

    ThreadEntry { name, profile }
}

/// Build a [`ThreadProfile`] from a raw thread object
pub fn parse_thread(value: &serde_json::Value) -> Result<ThreadProfile, ParseError> {
    let raw: RawThread = serde_json::from_value(value.clone())?;
    let strings = extract_string_table(value)?;

    if raw.samples.stack.len() != raw.samples.time.len() {
        return Err(ParseError::InvalidFormat(format!(
            "samples.stack has {} entries but samples.time has {}",
            raw.samples.stack.len(),
            raw.samples.time.len()
        )));
    }
    if raw.stack_table.prefix.len() != raw.stack_table.frame.len() {
        return Err(ParseError::InvalidFormat(format!(
            "stackTable.prefix has {} entries but stackTable.frame has {}",
            raw.stack_table.prefix.len(),
            raw.stack_table.frame.len()
        )));
    }

    let samples = raw
        .samples
        .stack
        .iter()
        .zip(&raw.samples.time)
        .map(|(stack, time)| Sample {
            time: *time,
            stack: to_index(*stack),
        })
        .collect();

    let nodes = raw
        .stack_table
        .prefix
        .iter()
        .zip(&raw.stack_table.frame)
        .map(|(prefix, frame)| {
            let frame = required_index(*frame, "stackTable.frame")?;
            let func = raw.frame_table.func.get(frame).copied().ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Frame {} out of range (frameTable has {} entries)",
                    frame,
                    raw.frame_table.func.len()
                ))
            })?;
            Ok(StackNode {
                parent: to_index(*prefix),
                func: required_index(func, "frameTable.func")?,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    let func_count = raw.func_table.name.len();
    let name = raw
        .func_table
        .name
        .iter()
        .map(|n| required_index(*n, "funcTable.name"))
        .collect::<Result<Vec<_>, _>>()?;
    let resource = pad_column(&raw.func_table.resource, func_count)
        .into_iter()
        .map(to_index)
        .collect();
    let address = func_addresses(&raw, func_count);

    let resource_table = ResourceTable {
        lib: raw.resource_table.lib.iter().map(|l| to_index(*l)).collect(),
        name: raw
            .resource_table
            .name
            .iter()
            .map(|n| required_index(*n, "resourceTable.name"))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(ThreadProfile {
        name: raw.name,
        samples,
        stack_tree: CallStackTree::new(nodes),
        func_table: FuncTable {
            name,
            resource,
            address,
        },
        resource_table,
        string_table: StringTable::new(strings),
    })
}

/// Function addresses, preferring `funcTable.address` and falling back to
/// the address of the first frame that belongs to each function
///
/// **Private** - internal helper for parse_thread
fn func_addresses(raw: &RawThread, func_count: usize) -> Vec<Option<u64>> {
    let mut addresses: Vec<Option<u64>> = pad_column(&raw.func_table.address, func_count)
        .into_iter()
        .map(to_address)
        .collect();

    for (frame, func) in raw.frame_table.func.iter().enumerate() {
        let Some(func) = to_index(Some(*func)) else {
            continue;
        };
        if let Some(slot) = addresses.get_mut(func) {
            if slot.is_none() {
                *slot = raw.frame_table.address.get(frame).copied().and_then(to_address);
            }
        }
    }

    addresses
}

/// Extract the string table, trying each known field name
///
/// **Private** - internal extraction logic
fn extract_string_table(value: &serde_json::Value) -> Result<Vec<String>, ParseError> {
    for field in STRING_TABLE_FIELD_NAMES {
        if let Some(strings) = value.get(*field) {
            return Ok(serde_json::from_value(strings.clone())?);
        }
    }
    Err(ParseError::InvalidFormat(
        "Thread has no string table".to_string(),
    ))
}

/// Compute how many leading sampling intervals precede navigation
///
/// **Public** - used by the analyze command to configure the pipeline
///
/// The threshold is `unloadEventEnd`, or `responseStart` when the former is
/// missing or zero. Profiles without navigation timing skip nothing.
pub fn skip_intervals(meta: &ProfileMeta, thread: &ThreadProfile) -> u64 {
    let Some(first) = thread.samples.first() else {
        return 0;
    };
    let Some(perf) = &meta.performance else {
        return 0;
    };
    let threshold = perf
        .timing
        .unload_event_end
        .filter(|t| *t != 0.0)
        .or(perf.timing.response_start);
    let Some(threshold) = threshold else {
        return 0;
    };

    let skip_ms = threshold - (meta.start_time + first.time);
    if skip_ms <= 0.0 {
        return 0;
    }
    (skip_ms / meta.interval).floor() as u64
}

/// Assemble the summary handed to the rendering layer
///
/// **Public** - used by commands to create final output
pub fn to_summary(
    parsed: &ParsedProfile,
    threads: Vec<ThreadSummary>,
    rules: &RuleSet,
) -> Summary {
    use chrono::Utc;

    Summary {
        version: SCHEMA_VERSION.to_string(),
        url: parsed.meta.url.clone(),
        interval_ms: parsed.meta.interval,
        categories: rules.categories().to_vec(),
        threads,
        generated_at: Utc::now().to_rfc3339(),
    }
}

fn to_index(value: Option<i64>) -> Option<usize> {
    value.filter(|v| *v >= 0).map(|v| v as usize)
}

fn to_address(value: Option<i64>) -> Option<u64> {
    value.filter(|v| *v >= 0).map(|v| v as u64)
}

fn required_index(value: i64, column: &str) -> Result<usize, ParseError> {
    to_index(Some(value)).ok_or_else(|| {
        ParseError::InvalidFormat(format!("Negative reference {} in {}", value, column))
    })
}

/// Optional columns may be absent; treat missing rows as null
fn pad_column(column: &[Option<i64>], len: usize) -> Vec<Option<i64>> {
    (0..len).map(|i| column.get(i).copied().flatten()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_thread() -> serde_json::Value {
        json!({
            "name": "GeckoMain",
            "samples": { "stack": [1, null, -1], "time": [0.0, 1.0, 2.0] },
            "stackTable": { "prefix": [null, 0], "frame": [0, 1] },
            "frameTable": { "func": [0, 1], "address": [-1, 4096] },
            "funcTable": { "name": [0, 1], "resource": [-1, 0] },
            "resourceTable": { "lib": [0], "name": [2] },
            "stringArray": ["main", "0x1000", "libxul.so"]
        })
    }

    #[test]
    fn test_parse_thread_tables() {
        let thread = parse_thread(&minimal_thread()).unwrap();
        assert_eq!(thread.name, "GeckoMain");
        assert_eq!(thread.samples.len(), 3);
        assert_eq!(thread.samples[0].stack, Some(1));
        assert_eq!(thread.samples[1].stack, None);
        assert_eq!(thread.samples[2].stack, None);
        assert_eq!(thread.stack_tree.get(1), Some(&StackNode { parent: Some(0), func: 1 }));
        assert_eq!(thread.func_table.address, vec![None, Some(4096)]);
        assert_eq!(thread.func_lib(1), Some(0));
        assert_eq!(thread.func_lib(0), None);
    }

    #[test]
    fn test_string_table_legacy_name() {
        let mut value = minimal_thread();
        let strings = value.as_object_mut().unwrap().remove("stringArray").unwrap();
        value["stringTable"] = strings;
        let thread = parse_thread(&value).unwrap();
        assert_eq!(thread.string_table.get(0), Some("main"));
    }

    #[test]
    fn test_mismatched_sample_columns() {
        let mut value = minimal_thread();
        value["samples"]["time"] = json!([0.0]);
        assert!(matches!(
            parse_thread(&value),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_frame_out_of_range() {
        let mut value = minimal_thread();
        value["stackTable"]["frame"] = json!([0, 7]);
        assert!(parse_thread(&value).is_err());
    }

    #[test]
    fn test_skip_intervals() {
        let thread = parse_thread(&minimal_thread()).unwrap();
        let mut meta = ProfileMeta {
            start_time: 1000.0,
            interval: 2.0,
            ..Default::default()
        };
        assert_eq!(skip_intervals(&meta, &thread), 0);

        meta.performance = Some(PerformanceInfo {
            timing: NavigationTiming {
                unload_event_end: Some(0.0),
                response_start: Some(1009.0),
            },
        });
        assert_eq!(skip_intervals(&meta, &thread), 4);

        meta.performance = Some(PerformanceInfo {
            timing: NavigationTiming {
                unload_event_end: Some(1004.0),
                response_start: Some(1009.0),
            },
        });
        assert_eq!(skip_intervals(&meta, &thread), 2);

        meta.performance = Some(PerformanceInfo {
            timing: NavigationTiming {
                unload_event_end: Some(900.0),
                response_start: None,
            },
        });
        assert_eq!(skip_intervals(&meta, &thread), 0);
    }

    #[test]
    fn test_parse_profile_keeps_bad_threads() {
        let raw = json!({
            "meta": { "startTime": 0.0, "interval": 1.0 },
            "threads": [minimal_thread(), { "name": "Broken" }]
        });
        let parsed = parse_profile(&raw).unwrap();
        assert_eq!(parsed.threads.len(), 2);
        assert!(parsed.threads[0].profile.is_ok());
        assert_eq!(parsed.threads[1].name, "Broken");
        assert!(parsed.threads[1].profile.is_err());
    }

    #[test]
    fn test_parse_profile_rejects_non_object() {
        assert!(parse_profile(&json!([1, 2, 3])).is_err());
        assert!(parse_profile(&json!({ "threads": [] })).is_err());
    }
}
