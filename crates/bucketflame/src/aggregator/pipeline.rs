//! One aggregation pass per thread.
//!
//! resolve → collapse → skip leading → classify → merge → {flame, buckets}
//!
//! Each thread is an independent pass over its own arena and the shared,
//! immutable rule set. A structural error aborts only that thread.

use super::buckets::{accumulate_buckets, BucketTotals};
use super::call_stack::resolve_samples;
use super::classifier::classify_runs;
use super::flame::{assemble_flame, FlameGraph};
use super::runs::{collapse_call_stacks, merge_classified, skip_leading, total_weight};
use crate::parser::{
    skip_intervals, BucketRecord, ParsedProfile, SliceRecord, ThreadProfile, ThreadSummary,
};
use crate::rules::RuleSet;
use crate::utils::error::AggregateError;
use log::{debug, info, warn};

/// Options for a single thread pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Leading sampling intervals to discard
    pub skip_intervals: u64,
}

/// Options for a whole-profile pass
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Discard samples captured before the navigation threshold
    pub apply_skip: bool,

    /// Only aggregate threads with this name
    pub thread_filter: Option<String>,
}

/// Everything one pass produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadAggregate {
    pub flame: FlameGraph,
    pub buckets: Vec<BucketTotals>,
    pub sample_count: u64,
    pub skipped_samples: u64,
    pub collapsed_runs: usize,
    pub merged_runs: usize,
}

/// Run the full pipeline over one thread
///
/// **Public** - main entry point for aggregation
///
/// # Errors
/// Any [`AggregateError`] raised while resolving call stacks; the pass
/// produces nothing partial.
pub fn aggregate_thread(
    thread: &ThreadProfile,
    rules: &RuleSet,
    options: &AggregateOptions,
) -> Result<ThreadAggregate, AggregateError> {
    let stacks = resolve_samples(thread)?;
    let sample_count = stacks.len() as u64;

    let collapsed = collapse_call_stacks(stacks);
    let collapsed_runs = collapsed.len();

    let (kept, skipped_samples) = skip_leading(collapsed, options.skip_intervals);
    if skipped_samples > 0 {
        debug!(
            "Skipped {} leading samples of thread '{}'",
            skipped_samples, thread.name
        );
    }

    let classified = classify_runs(&kept, rules);
    let merged = merge_classified(classified);
    debug_assert_eq!(total_weight(&merged), sample_count - skipped_samples);

    let flame = assemble_flame(&merged);
    let buckets = accumulate_buckets(&merged, rules.category_count());

    Ok(ThreadAggregate {
        flame,
        buckets,
        sample_count,
        skipped_samples,
        collapsed_runs,
        merged_runs: merged.len(),
    })
}

/// Convert a thread aggregate into its output record
pub fn summarize_thread(
    thread: &ThreadProfile,
    aggregate: &ThreadAggregate,
    rules: &RuleSet,
) -> ThreadSummary {
    let slices = aggregate
        .flame
        .slices
        .iter()
        .map(|slice| SliceRecord {
            category: rules.category_name(slice.category).to_string(),
            start: slice.start,
            depth: slice.depth,
            weight: slice.weight,
        })
        .collect();

    let buckets = aggregate
        .buckets
        .iter()
        .map(|totals| BucketRecord {
            category: rules.category_name(totals.category).to_string(),
            top_weight: totals.top_weight,
            tail_weight: totals.tail_weight,
        })
        .collect();

    ThreadSummary {
        name: thread.name.clone(),
        duration_ms: thread.duration_ms(),
        sample_count: aggregate.sample_count,
        skipped_samples: aggregate.skipped_samples,
        total_weight: aggregate.flame.total_weight,
        max_depth: aggregate.flame.max_depth,
        slices,
        buckets,
        error: None,
    }
}

/// Aggregate every (selected) thread of a profile independently
///
/// **Public** - used by the analyze command
///
/// Threads that failed to parse or hit a structural error are reported
/// with `error` set; the others are unaffected.
pub fn aggregate_profile(
    parsed: &ParsedProfile,
    rules: &RuleSet,
    options: &ProfileOptions,
) -> Vec<ThreadSummary> {
    parsed
        .threads
        .iter()
        .filter(|entry| {
            options
                .thread_filter
                .as_deref()
                .map_or(true, |name| entry.name == name)
        })
        .map(|entry| {
            let thread = match &entry.profile {
                Ok(thread) => thread,
                Err(e) => return failed_summary(&entry.name, None, e.to_string()),
            };

            let skip = if options.apply_skip {
                skip_intervals(&parsed.meta, thread)
            } else {
                0
            };

            match aggregate_thread(thread, rules, &AggregateOptions { skip_intervals: skip }) {
                Ok(aggregate) => {
                    info!(
                        "Thread '{}': {} samples, {} runs, {} merged runs, {} slices",
                        entry.name,
                        aggregate.sample_count,
                        aggregate.collapsed_runs,
                        aggregate.merged_runs,
                        aggregate.flame.slices.len()
                    );
                    let mut summary = summarize_thread(thread, &aggregate, rules);
                    summary.name = entry.name.clone();
                    summary
                }
                Err(e) => {
                    warn!("Aggregation of thread '{}' aborted: {}", entry.name, e);
                    failed_summary(&entry.name, Some(thread), e.to_string())
                }
            }
        })
        .collect()
}

fn failed_summary(name: &str, thread: Option<&ThreadProfile>, error: String) -> ThreadSummary {
    ThreadSummary {
        name: name.to_string(),
        duration_ms: thread.map(ThreadProfile::duration_ms).unwrap_or(0.0),
        sample_count: thread.map(|t| t.samples.len() as u64).unwrap_or(0),
        error: Some(error),
        ..Default::default()
    }
}
