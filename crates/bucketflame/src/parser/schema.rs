//! Output JSON schema definitions for summary data.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level summary structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Page the profile was captured on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Sampling interval; one unit of weight is one interval
    pub interval_ms: f64,

    /// Category set in color-domain order, catch-all first
    pub categories: Vec<String>,

    /// One entry per thread, failed threads included
    pub threads: Vec<ThreadSummary>,

    /// Timestamp when summary was generated
    pub generated_at: String,
}

/// Aggregation result for one thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub name: String,

    /// Time between first and last sample
    pub duration_ms: f64,

    /// Samples fed into the pipeline
    pub sample_count: u64,

    /// Samples dropped before the navigation threshold
    pub skipped_samples: u64,

    /// Sum of all run weights after skipping
    pub total_weight: u64,

    /// Longest label sequence seen
    pub max_depth: usize,

    /// Flame graph slices in opening order
    pub slices: Vec<SliceRecord>,

    /// Per-category top/tail totals
    pub buckets: Vec<BucketRecord>,

    /// Structural error that aborted this thread's pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One flame graph rectangle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRecord {
    pub category: String,

    /// Weight preceding the slice's first interval
    pub start: u64,

    /// Distance from the outermost frame
    pub depth: usize,

    pub weight: u64,
}

/// Leaf time and ancestor time of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub category: String,
    pub top_weight: u64,
    pub tail_weight: u64,
}
