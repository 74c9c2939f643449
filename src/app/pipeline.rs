//! Shared sweep pipeline used by the CLI entry point.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load descriptors -> run trials -> scan events
//!
//! The CLI then focuses on presentation and file placement.

use std::path::PathBuf;

use crate::domain::{AxisMode, TrialEvent, TrialResult};
use crate::error::AppError;
use crate::io::ingest::RowError;
use crate::scan::scan_events;
use crate::trial::{SweepOptions, run_trials, run_trials_parallel};

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sweep_path: PathBuf,
    pub series_csv: Option<PathBuf>,
    pub series_axes: AxisMode,
    pub parallel: bool,
    pub scan: bool,
}

/// All computed outputs of a single sweep run.
pub struct RunOutput {
    pub results: Vec<TrialResult>,
    pub events: Vec<TrialEvent>,
    /// Rows skipped while loading CSV series, for reporting.
    pub row_errors: Vec<RowError>,
}

/// Execute the full sweep pipeline and return the computed outputs.
pub fn run_sweep(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Load and resolve descriptors.
    let (mut series, accels) = crate::io::config::load_sweep_file(&config.sweep_path)?;

    let mut row_errors = Vec::new();
    if let Some(path) = &config.series_csv {
        let ingest = crate::io::ingest::load_series_csv(path)?;
        series.extend(ingest.descriptors);
        row_errors = ingest.row_errors;
    }

    if series.is_empty() {
        return Err(AppError::new(3, "No series loaded; nothing to do."));
    }
    if accels.is_empty() {
        return Err(AppError::new(3, "No acceleration methods loaded; nothing to do."));
    }

    // 2) Run every (series, method) pair.
    let options = SweepOptions {
        series_axes: config.series_axes,
    };
    let results = if config.parallel {
        run_trials_parallel(&series, &accels, &options)?
    } else {
        run_trials(&series, &accels, &options)?
    };

    // 3) Scan for acceleration-quality anomalies.
    let events = if config.scan {
        scan_events(&results)
    } else {
        Vec::new()
    };

    Ok(RunOutput {
        results,
        events,
        row_errors,
    })
}
