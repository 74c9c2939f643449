//! Execution of one (series, accelerator) descriptor pair.
//!
//! For each combination drawn from
//! `series bindings × m_values × cartesian(additional_args)` the executor:
//!
//! 1. builds the series and asks for its limit; a failure here aborts only
//!    this configuration, with no `n` recorded as context
//! 2. walks `n_values` in order, building the accelerator and computing the
//!    raw and accelerated estimates plus their deviations from the limit
//! 3. on a mid-sequence failure, stops the `n` walk, records the failing `n`,
//!    and keeps every point already computed
//!
//! One `TrialResult` is emitted per combination, failed or not. A requested
//! combination with no result is a defect, so nothing is ever dropped.

use std::sync::Arc;

use crate::domain::{
    AccelDescriptor, AccelRecord, Assignment, AxisMode, ComputedPoint, ErrorRecord, ReadySeries,
    SeriesDescriptor, SeriesRecord, TrialError, TrialResult,
};
use crate::error::AppError;
use crate::sweep::{expand_cartesian, expand_parallel};

/// Run-wide execution options.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    /// How series argument axes combine. Earlier generations of this tool
    /// crossed them; zipping is the current behavior, so it is the default.
    pub series_axes: AxisMode,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            series_axes: AxisMode::Parallel,
        }
    }
}

/// Execute every combination of one (series, accelerator) pair, in order.
pub fn run_pair(
    series: &SeriesDescriptor,
    accel: &AccelDescriptor,
    options: &SweepOptions,
) -> Result<Vec<TrialResult>, AppError> {
    let bindings = match options.series_axes {
        AxisMode::Parallel => expand_parallel(series.arguments())?,
        AxisMode::Cartesian => expand_cartesian(series.arguments()).collect(),
    };

    let mut out = Vec::new();
    for binding in &bindings {
        for &m in accel.m_values() {
            for accel_args in expand_cartesian(accel.additional_args()) {
                let seq = out.len();
                out.push(run_one(series, accel, binding, m, &accel_args, seq));
            }
        }
    }
    Ok(out)
}

/// Execute a single concrete configuration. Never fails: every failure is
/// folded into the returned record.
fn run_one(
    series: &SeriesDescriptor,
    accel: &AccelDescriptor,
    binding: &Assignment,
    m: u32,
    accel_args: &Assignment,
    seq: usize,
) -> TrialResult {
    let id = format!("{}:{}#{seq:04}", series.name(), accel.name());
    let accel_record = AccelRecord {
        name: accel.name().to_string(),
        m_value: m,
        additional_args: accel_args.to_compact_string(),
    };

    // Series construction and limit lookup. Failing here means no `n` was
    // ever attempted.
    let built = series
        .factory()
        .build(binding)
        .and_then(|ready| ready.limit().map(|limit| (ready, limit)));
    let (ready, limit) = match built {
        Ok((ready, limit)) => (ready, limit),
        Err(err) => {
            return TrialResult {
                id,
                series: SeriesRecord {
                    name: series.name().to_string(),
                    limit: None,
                    argument_binding: binding.clone(),
                },
                accel: accel_record,
                computed: Vec::new(),
                error: Some(ErrorRecord {
                    description: err.to_string(),
                    context: None,
                }),
            };
        }
    };

    let mut computed = Vec::with_capacity(accel.n_values().len());
    let mut error = None;
    for &n in accel.n_values() {
        match compute_point(accel, Arc::clone(&ready), accel_args, n, m, limit) {
            Ok(point) => computed.push(point),
            Err(err) => {
                error = Some(ErrorRecord {
                    description: err.to_string(),
                    context: Some(n),
                });
                break;
            }
        }
    }

    TrialResult {
        id,
        series: SeriesRecord {
            name: series.name().to_string(),
            limit: Some(limit),
            argument_binding: binding.clone(),
        },
        accel: accel_record,
        computed,
        error,
    }
}

fn compute_point(
    accel: &AccelDescriptor,
    series: Arc<dyn ReadySeries>,
    accel_args: &Assignment,
    n: u32,
    m: u32,
    limit: f64,
) -> Result<ComputedPoint, TrialError> {
    let accelerator = accel.factory().build(Arc::clone(&series), accel_args)?;
    let accel_value = accelerator.estimate(n, m)?;
    let partial_sum = series.partial_sum(n)?;

    // Collaborators are expected to reject their own numeric breakdowns, but
    // a quiet NaN would otherwise poison deviations and exports.
    if !accel_value.is_finite() {
        return Err(TrialError::computation(format!(
            "non-finite accelerated estimate at n={n}, m={m}"
        )));
    }
    if !partial_sum.is_finite() {
        return Err(TrialError::computation(format!(
            "non-finite partial sum at n={n}"
        )));
    }

    Ok(ComputedPoint {
        n,
        partial_sum,
        partial_sum_deviation: (partial_sum - limit).abs(),
        accel_value,
        accel_value_deviation: (accel_value - limit).abs(),
    })
}
