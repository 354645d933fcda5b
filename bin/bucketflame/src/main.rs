//! Bucketflame CLI
//!
//! Categorized flame graphs and per-category time breakdowns from sampled
//! profiler traces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use bucketflame::commands::{
    display_rules, display_schema, display_version, execute_analyze, validate_args,
    validate_summary_file, AnalyzeArgs,
};
use bucketflame::utils::config::{
    DEFAULT_SUMMARY_PATH, DEFAULT_SYMBOL_SERVER, RULES_ENV_VAR, SYMBOL_SERVER_ENV_VAR,
};

/// Bucketflame - categorized flame graphs for sampled profiles
#[derive(Parser, Debug)]
#[command(name = "bucketflame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a profile into category flame graphs
    Analyze {
        /// Profile JSON file or http(s) URL
        #[arg(short, long)]
        input: String,

        /// Output path for the summary JSON (placed in artifacts/ by default)
        #[arg(short, long, default_value = DEFAULT_SUMMARY_PATH)]
        output: PathBuf,

        /// Rule table (TOML) replacing the built-in rules
        #[arg(short, long, env = RULES_ENV_VAR)]
        rules: Option<PathBuf>,

        /// Symbolication server base URL (Mozilla's public server when given without a value)
        #[arg(
            long,
            env = SYMBOL_SERVER_ENV_VAR,
            num_args = 0..=1,
            default_missing_value = DEFAULT_SYMBOL_SERVER
        )]
        symbol_server: Option<String>,

        /// Breakpad symbol store root
        #[arg(long)]
        symbols_dir: Option<PathBuf>,

        /// Directory holding native binaries to symbolicate from
        #[arg(long)]
        binaries_dir: Option<PathBuf>,

        /// Only aggregate the thread with this name
        #[arg(short, long)]
        thread: Option<String>,

        /// Keep samples captured before navigation
        #[arg(long)]
        no_skip: bool,

        /// Print the bucket report to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a summary JSON file
    Validate {
        /// Path to summary JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List rules in priority order
    Rules {
        /// Rule table (TOML); built-in rules when omitted
        #[arg(short, long, env = RULES_ENV_VAR)]
        rules: Option<PathBuf>,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            mut output,
            rules,
            symbol_server,
            symbols_dir,
            binaries_dir,
            thread,
            no_skip,
            summary,
        } => {
            // Bare file names go to artifacts/
            if output.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
                output = PathBuf::from("artifacts").join(output);
            }

            let args = AnalyzeArgs {
                input,
                output,
                rules,
                symbol_server,
                symbols_dir,
                binaries_dir,
                thread,
                apply_skip: !no_skip,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_summary_file(file)?;
        }

        Commands::Rules { rules } => {
            display_rules(rules.as_deref())?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(args: &[&str]) -> Commands {
        let argv = ["bucketflame", "analyze", "--input", "profile.json"];
        Cli::try_parse_from(argv.iter().chain(args)).unwrap().command
    }

    #[test]
    fn test_symbol_server_flag_without_value_uses_default() {
        match analyze(&["--symbol-server"]) {
            Commands::Analyze { symbol_server, .. } => {
                assert_eq!(symbol_server.as_deref(), Some(DEFAULT_SYMBOL_SERVER));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_symbol_server_flag_with_value() {
        match analyze(&["--symbol-server", "http://localhost:8000"]) {
            Commands::Analyze { symbol_server, output, .. } => {
                assert_eq!(symbol_server.as_deref(), Some("http://localhost:8000"));
                assert_eq!(output, PathBuf::from(DEFAULT_SUMMARY_PATH));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
