//! Bucketflame library
//!
//! Turns sampled profiler traces into categorized flame graphs and
//! per-category time breakdowns.

pub mod aggregator;
pub mod commands;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod rules;
pub mod symbols;
pub mod utils;
