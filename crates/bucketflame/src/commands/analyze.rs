//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the profile (file or URL)
//! 2. Parses metadata, libraries and threads
//! 3. Loads the rule table
//! 4. Symbolicates native functions (optional)
//! 5. Aggregates every thread into a category flame graph
//! 6. Writes the summary JSON

use crate::aggregator::{aggregate_profile, ProfileOptions};
use crate::commands::models::AnalyzeArgs;
use crate::fetch::{is_url, ProfileClient};
use crate::output::{format_bucket_report, write_summary};
use crate::parser::{parse_profile, to_summary, ParsedProfile, Summary};
use crate::rules::{load_rules, RuleSet};
use crate::symbols::{
    symbolicate_thread, BinaryProvider, BreakpadStore, ProviderChain, SymbolServerClient,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Profile download or read failures
/// * Malformed profile documents
/// * Invalid rule tables
/// * File write errors
///
/// Thread-level failures are recorded in the summary instead.
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting analysis of: {}", args.input);

    info!("Loading profile...");
    let raw = load_profile_value(&args.input)?;

    let summary = analyze_value(&raw, &args)?;

    write_summary(&summary, &args.output).context("Failed to write summary JSON")?;
    info!("✓ Summary written to: {}", args.output.display());

    let failed = summary.threads.iter().filter(|t| t.error.is_some()).count();
    if failed > 0 {
        warn!("{} of {} threads failed to aggregate", failed, summary.threads.len());
    }

    if args.print_summary {
        println!("{}", format_bucket_report(&summary));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Run the pipeline over an already-loaded profile document
///
/// **Public** - everything `execute_analyze` does short of file I/O
pub fn analyze_value(raw: &serde_json::Value, args: &AnalyzeArgs) -> Result<Summary> {
    info!("Parsing profile...");
    let mut parsed = parse_profile(raw).context("Failed to parse profile")?;
    debug!(
        "Parsed profile: {} threads, {} libraries, {} ms interval",
        parsed.threads.len(),
        parsed.libs.len(),
        parsed.meta.interval
    );

    let rules = load_rule_set(args)?;
    info!(
        "Using {} rules in {} categories",
        rules.rules().len(),
        rules.category_count()
    );

    if args.wants_symbols() {
        info!("Symbolicating native functions...");
        symbolicate_profile(&mut parsed, args)?;
    }

    info!("Aggregating threads...");
    let options = ProfileOptions {
        apply_skip: args.apply_skip,
        thread_filter: args.thread.clone(),
    };
    let threads = aggregate_profile(&parsed, &rules, &options);
    if threads.is_empty() {
        match &args.thread {
            Some(name) => warn!("No thread named '{}' in profile", name),
            None => warn!("Profile contains no threads"),
        }
    }

    Ok(to_summary(&parsed, threads, &rules))
}

/// Read a profile from disk or download it
///
/// **Private** - internal helper for execute_analyze
fn load_profile_value(input: &str) -> Result<serde_json::Value> {
    if is_url(input) {
        let client = ProfileClient::new().context("Failed to create HTTP client")?;
        return client
            .fetch_profile(input)
            .with_context(|| format!("Failed to fetch profile from {}", input));
    }

    let file = File::open(input).with_context(|| format!("Failed to open profile {}", input))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Profile {} is not valid JSON", input))?;
    Ok(value)
}

/// Load the configured rule table, or the built-in one
///
/// **Private** - internal helper for analyze_value
fn load_rule_set(args: &AnalyzeArgs) -> Result<RuleSet> {
    match &args.rules {
        Some(path) => load_rules(path)
            .with_context(|| format!("Failed to load rules from {}", path.display())),
        None => RuleSet::builtin().context("Built-in rule table failed to compile"),
    }
}

/// Symbolicate every parsed thread with the configured providers
///
/// **Private** - internal helper for analyze_value
fn symbolicate_profile(parsed: &mut ParsedProfile, args: &AnalyzeArgs) -> Result<()> {
    let mut chain = ProviderChain::new();
    if let Some(dir) = &args.symbols_dir {
        chain.push(Box::new(BreakpadStore::new(dir)));
    }
    if let Some(dir) = &args.binaries_dir {
        chain.push(Box::new(BinaryProvider::new(dir)));
    }
    if let Some(url) = &args.symbol_server {
        let client =
            SymbolServerClient::new(url.as_str()).context("Failed to create symbol server client")?;
        chain.push(Box::new(client));
    }

    let ParsedProfile { libs, threads, .. } = parsed;
    for entry in threads.iter_mut() {
        if let Ok(thread) = &mut entry.profile {
            symbolicate_thread(thread, libs, &chain);
        }
    }
    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.is_empty() {
        anyhow::bail!("Input cannot be empty");
    }

    if !is_url(&args.input) && !std::path::Path::new(&args.input).is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input);
    }

    if let Some(url) = &args.symbol_server {
        if !is_url(url) {
            anyhow::bail!("Symbol server URL must start with http:// or https://");
        }
    }

    for dir in [&args.symbols_dir, &args.binaries_dir].into_iter().flatten() {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }
    }

    if let Some(rules) = &args.rules {
        if !rules.is_file() {
            anyhow::bail!("Rule file does not exist: {}", rules.display());
        }
    }

    if matches!(&args.thread, Some(name) if name.is_empty()) {
        anyhow::bail!("Thread name cannot be empty");
    }

    Ok(())
}
