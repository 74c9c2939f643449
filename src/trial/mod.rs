//! Trial orchestration.
//!
//! Responsibilities:
//!
//! - expand each (series, accelerator) descriptor pair into its combination
//!   space and execute it (`executor`)
//! - cross every series descriptor against every accelerator descriptor and
//!   concatenate the outputs, deterministically (`run_trials`)
//!
//! Ordering is part of the contract: CSV export has no independent ordering
//! key, so two runs with the same inputs must produce the same sequence.

pub mod executor;

pub use executor::*;

use rayon::prelude::*;

use crate::domain::{AccelDescriptor, SeriesDescriptor, TrialResult};
use crate::error::AppError;

/// Run every (series, accelerator) pair sequentially: outer loop over series
/// descriptors, inner loop over accelerator descriptors.
pub fn run_trials(
    series: &[SeriesDescriptor],
    accels: &[AccelDescriptor],
    options: &SweepOptions,
) -> Result<Vec<TrialResult>, AppError> {
    let mut out = Vec::new();
    for s in series {
        for a in accels {
            out.extend(run_pair(s, a, options)?);
        }
    }
    Ok(out)
}

/// Parallel variant of `run_trials`.
///
/// Configurations share no state, so the pairs fan out across a thread pool;
/// collecting through rayon keeps the pair order, which restores the exact
/// sequence the sequential driver produces.
pub fn run_trials_parallel(
    series: &[SeriesDescriptor],
    accels: &[AccelDescriptor],
    options: &SweepOptions,
) -> Result<Vec<TrialResult>, AppError> {
    let pairs: Vec<(&SeriesDescriptor, &AccelDescriptor)> = series
        .iter()
        .flat_map(|s| accels.iter().map(move |a| (s, a)))
        .collect();

    let per_pair: Vec<Vec<TrialResult>> = pairs
        .par_iter()
        .map(|(s, a)| run_pair(s, a, options))
        .collect::<Result<_, AppError>>()?;

    Ok(per_pair.into_iter().flatten().collect())
}
