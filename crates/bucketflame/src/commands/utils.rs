use crate::output::read_summary;
use crate::rules::{load_rules, RuleSet};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Validate a summary JSON file
pub fn validate_summary_file(file_path: PathBuf) -> Result<()> {
    println!("Validating summary: {}", file_path.display());

    let summary = read_summary(&file_path)?;

    println!("✓ Valid summary JSON");
    println!("  Version: {}", summary.version);
    if let Some(url) = &summary.url {
        println!("  URL: {}", url);
    }
    println!("  Interval: {} ms", summary.interval_ms);
    println!("  Categories: {}", summary.categories.join(", "));
    println!("  Threads: {}", summary.threads.len());
    for thread in &summary.threads {
        match &thread.error {
            Some(error) => println!("    {} (failed: {})", thread.name, error),
            None => println!(
                "    {} ({} slices, weight {})",
                thread.name,
                thread.slices.len(),
                thread.total_weight
            ),
        }
    }

    Ok(())
}

/// Print a rule table in priority order
pub fn display_rules(rules_path: Option<&Path>) -> Result<()> {
    let rules = match rules_path {
        Some(path) => {
            println!("Rules from {}", path.display());
            load_rules(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => {
            println!("Built-in rules");
            RuleSet::builtin()?
        }
    };
    println!();

    for (index, rule) in rules.rules().iter().enumerate() {
        println!(
            "  {:>3}. {:<16} {}",
            index + 1,
            rule.bucket,
            rule.pattern.as_str()
        );
    }
    println!();
    println!("Categories: {}", rules.categories().join(", "));

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Bucketflame Summary Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  url: string?             - Page the profile was captured on");
        println!("  interval_ms: number      - Sampling interval (one unit of weight)");
        println!("  categories: array        - Category set, catch-all '*' first");
        println!("  threads: array           - One entry per thread");
        println!("    name: string           - Thread name");
        println!("    duration_ms: number    - First to last sample");
        println!("    sample_count: number   - Samples fed to the pipeline");
        println!("    skipped_samples: number - Samples before navigation");
        println!("    total_weight: number   - Weight after skipping");
        println!("    max_depth: number      - Longest label sequence");
        println!("    slices: array          - Flame graph slices");
        println!("      category, start, depth, weight");
        println!("    buckets: array         - Per-category totals");
        println!("      category, top_weight, tail_weight");
        println!("    error: string?         - Why the thread failed");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Bucketflame v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Categorized flame graphs from sampled profiler traces.");
}
