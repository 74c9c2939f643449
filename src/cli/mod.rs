//! Command-line parsing for the trial runner.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the engine code. Everything here stays thin:
//! flags map onto a `RunConfig`, nothing more.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::AxisMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trials", version, about = "Series acceleration trial runner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute a sweep file and export results/events.
    Run(RunArgs),
    /// List the built-in series and acceleration methods.
    List,
}

/// Options for executing a sweep.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Sweep JSON file describing series and acceleration methods.
    #[arg(value_name = "SWEEP")]
    pub sweep: PathBuf,

    /// Additional array-backed series, one per CSV row.
    #[arg(long, value_name = "CSV")]
    pub series_csv: Option<PathBuf>,

    /// Directory for default export paths.
    #[arg(long, default_value = "output")]
    pub out_dir: PathBuf,

    /// Results JSON path (default: <out-dir>/results.json).
    #[arg(long)]
    pub results_json: Option<PathBuf>,

    /// Results CSV path (default: <out-dir>/results.csv).
    #[arg(long)]
    pub results_csv: Option<PathBuf>,

    /// Events JSON path (default: <out-dir>/events.json).
    #[arg(long)]
    pub events_json: Option<PathBuf>,

    /// Events CSV path (default: <out-dir>/events.csv).
    #[arg(long)]
    pub events_csv: Option<PathBuf>,

    /// Skip the event scan (and its exports).
    #[arg(long)]
    pub no_events: bool,

    /// Fan (series, method) pairs out across worker threads.
    #[arg(long)]
    pub parallel: bool,

    /// How series argument axes combine: zipped or crossed.
    #[arg(long, value_enum, default_value_t = AxisMode::Parallel)]
    pub series_axes: AxisMode,
}
