//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads sweep descriptors
//! - runs the trial engine and the event scan
//! - writes exports
//! - prints the run summary

use clap::Parser;

use crate::cli::{Cli, Command, RunArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `trials` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::List => {
            println!("{}", crate::report::format_catalog_listing());
            Ok(())
        }
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let started = chrono::Local::now();
    let config = pipeline::RunConfig {
        sweep_path: args.sweep.clone(),
        series_csv: args.series_csv.clone(),
        series_axes: args.series_axes,
        parallel: args.parallel,
        scan: !args.no_events,
    };

    let run = pipeline::run_sweep(&config)?;

    for row_error in &run.row_errors {
        eprintln!(
            "warning: skipped series CSV row {}: {}",
            row_error.line, row_error.message
        );
    }

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output dir '{}': {e}", args.out_dir.display()),
        )
    })?;

    let results_json = args
        .results_json
        .unwrap_or_else(|| args.out_dir.join("results.json"));
    let results_csv = args
        .results_csv
        .unwrap_or_else(|| args.out_dir.join("results.csv"));
    crate::io::export::write_results_json(&results_json, &run.results)?;
    crate::io::export::write_results_csv(&results_csv, &run.results)?;

    if !args.no_events {
        let events_json = args
            .events_json
            .unwrap_or_else(|| args.out_dir.join("events.json"));
        let events_csv = args
            .events_csv
            .unwrap_or_else(|| args.out_dir.join("events.csv"));
        crate::io::export::write_events_json(&events_json, &run.events)?;
        crate::io::export::write_events_csv(&events_csv, &run.events, &run.results)?;
    }

    println!("Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "{}",
        crate::report::format_run_summary(&run.results, &run.events)
    );
    println!(
        "Exports: {}, {}",
        results_json.display(),
        results_csv.display()
    );

    Ok(())
}
