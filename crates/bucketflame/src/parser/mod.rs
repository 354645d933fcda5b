//! Profile parsing and schema definitions.
//!
//! This module handles:
//! - Parsing processed Gecko profile JSON
//! - Building per-thread stack tree arenas
//! - Computing the navigation-timing skip
//! - Defining output schema

pub mod gecko;
pub mod schema;
pub mod thread;

// Re-export main types
pub use gecko::{
    parse_profile, parse_thread, skip_intervals, to_summary, Library, ParsedProfile, ProfileMeta,
    ThreadEntry,
};
pub use schema::{BucketRecord, SliceRecord, Summary, ThreadSummary};
pub use thread::{
    CallStackTree, FuncTable, ResourceTable, Sample, StackNode, StringTable, ThreadProfile,
};
