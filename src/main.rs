//! music-file-finder - find audio files by their headers
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use music_file_finder::config::{CliArgs, ScanConfig};
use music_file_finder::summary::print_summary;
use music_file_finder::walker::run_scan;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    // Root must exist before anything is scanned
    config.validate_location()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    let show_summary = config.show_summary;
    let root = config.root.clone();
    let classifier = config.classifier;

    let result = runtime
        .block_on(run_scan(config, io::stdout(), io::stderr()))
        .context("Scan failed")?;

    if show_summary {
        print_summary(&result.stats, &root, &classifier);
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("music_file_finder=debug,warn")
    } else {
        EnvFilter::new("warn")
    };

    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
