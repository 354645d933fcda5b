//! Aggregation of sampled threads into category flame graphs.
//!
//! This module transforms parsed threads into:
//! - Collapsed, weighted call-stack runs
//! - Category label sequences (via the rule table)
//! - Flame graph slices and per-category top/tail totals

pub mod buckets;
pub mod call_stack;
pub mod classifier;
pub mod flame;
pub mod pipeline;
pub mod runs;

// Re-export main types and functions
pub use buckets::{accumulate_buckets, BucketAccumulator, BucketTotals};
pub use call_stack::{resolve_call_stack, resolve_samples, ResolvedCallStack};
pub use classifier::{classify, classify_runs};
pub use flame::{assemble_flame, FlameAssembler, FlameGraph, FlameSlice};
pub use pipeline::{
    aggregate_profile, aggregate_thread, summarize_thread, AggregateOptions, ProfileOptions,
    ThreadAggregate,
};
pub use runs::{collapse, collapse_call_stacks, merge_classified, skip_leading, total_weight, Run};
