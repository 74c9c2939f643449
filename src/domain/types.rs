//! Descriptors, capability interfaces, and trial records.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - used in-memory while a sweep executes
//! - exported to JSON/CSV
//! - reloaded later for inspection or comparisons
//!
//! Series and accelerator implementations are injected collaborators: the
//! engine only ever sees them through the factory traits below, resolved when
//! a descriptor is constructed, never by name probing at call time.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{Assignment, Axes};

/// Why a single configuration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialErrorKind {
    /// The collaborator rejected the binding (outside its valid domain).
    Domain,
    /// Numeric breakdown during evaluation (e.g. division by a vanishing
    /// remainder, non-finite intermediate).
    Computation,
}

/// A recoverable, per-configuration failure reported by a collaborator.
///
/// Both kinds collapse into the same `ErrorRecord` shape downstream; the
/// distinction survives only in the description text.
#[derive(Debug, Clone)]
pub struct TrialError {
    kind: TrialErrorKind,
    message: String,
}

impl TrialError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self {
            kind: TrialErrorKind::Domain,
            message: message.into(),
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        Self {
            kind: TrialErrorKind::Computation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TrialErrorKind {
        self.kind
    }
}

impl std::fmt::Display for TrialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TrialErrorKind::Domain => write!(f, "domain error: {}", self.message),
            TrialErrorKind::Computation => write!(f, "computation error: {}", self.message),
        }
    }
}

impl std::error::Error for TrialError {}

/// A series ready to be evaluated: concrete arguments already bound.
pub trait ReadySeries: Send + Sync {
    /// Partial sum through term `n`.
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError>;

    /// The series' closed-form/limit value.
    fn limit(&self) -> Result<f64, TrialError>;
}

/// A convergence-acceleration transform bound to one series.
pub trait Accelerator: Send + Sync + std::fmt::Debug {
    /// Accelerated estimate of the limit from `n` terms at transform order `m`.
    fn estimate(&self, n: u32, m: u32) -> Result<f64, TrialError>;
}

/// Builds a `ReadySeries` from one concrete argument binding.
pub trait SeriesFactory: Send + Sync {
    fn build(&self, binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError>;
}

/// Builds an `Accelerator` from a series plus concrete option values.
pub trait AccelFactory: Send + Sync {
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError>;
}

// Closures double as factories, which keeps synthetic collaborators in tests
// down to a couple of lines.
impl<F> SeriesFactory for F
where
    F: Fn(&Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> + Send + Sync,
{
    fn build(&self, binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        self(binding)
    }
}

impl<F> AccelFactory for F
where
    F: Fn(Arc<dyn ReadySeries>, &Assignment) -> Result<Box<dyn Accelerator>, TrialError>
        + Send
        + Sync,
{
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError> {
        self(series, options)
    }
}

/// What series to build and which candidate arguments to probe.
///
/// `arguments` holds one ordered candidate sequence per argument name; how the
/// axes combine (zipped vs crossed) is a run option, see `AxisMode`.
#[derive(Clone)]
pub struct SeriesDescriptor {
    name: String,
    arguments: Axes,
    factory: Arc<dyn SeriesFactory>,
}

impl SeriesDescriptor {
    pub fn new(name: impl Into<String>, arguments: Axes, factory: Arc<dyn SeriesFactory>) -> Self {
        Self {
            name: name.into(),
            arguments,
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Axes {
        &self.arguments
    }

    pub fn factory(&self) -> &Arc<dyn SeriesFactory> {
        &self.factory
    }
}

impl std::fmt::Debug for SeriesDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesDescriptor")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// What transform to build and which (n, m, options) space to probe.
///
/// `additional_args` axes are always crossed (cartesian), unlike series
/// argument axes.
#[derive(Clone)]
pub struct AccelDescriptor {
    name: String,
    n_values: Vec<u32>,
    m_values: Vec<u32>,
    additional_args: Axes,
    factory: Arc<dyn AccelFactory>,
}

impl AccelDescriptor {
    pub fn new(
        name: impl Into<String>,
        n_values: Vec<u32>,
        m_values: Vec<u32>,
        additional_args: Axes,
        factory: Arc<dyn AccelFactory>,
    ) -> Self {
        Self {
            name: name.into(),
            n_values,
            m_values,
            additional_args,
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_values(&self) -> &[u32] {
        &self.n_values
    }

    pub fn m_values(&self) -> &[u32] {
        &self.m_values
    }

    pub fn additional_args(&self) -> &Axes {
        &self.additional_args
    }

    pub fn factory(&self) -> &Arc<dyn AccelFactory> {
        &self.factory
    }
}

impl std::fmt::Debug for AccelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccelDescriptor")
            .field("name", &self.name)
            .field("n_values", &self.n_values)
            .field("m_values", &self.m_values)
            .field("additional_args", &self.additional_args)
            .finish_non_exhaustive()
    }
}

/// How a series descriptor's argument axes are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    /// Zip same-index values across axes (axes must have equal lengths).
    Parallel,
    /// Cross every value of every axis against the others.
    Cartesian,
}

impl std::fmt::Display for AxisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AxisMode::Parallel => "parallel",
            AxisMode::Cartesian => "cartesian",
        })
    }
}

/// Series context of one trial configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub name: String,
    /// Closed-form limit; absent when series construction itself failed.
    pub limit: Option<f64>,
    pub argument_binding: Assignment,
}

/// Accelerator context of one trial configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelRecord {
    pub name: String,
    pub m_value: u32,
    /// Concrete additional option values, stringified for export.
    pub additional_args: String,
}

/// One probed `n`: raw and accelerated estimates plus deviations from the
/// series limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedPoint {
    pub n: u32,
    pub partial_sum: f64,
    pub partial_sum_deviation: f64,
    pub accel_value: f64,
    pub accel_value_deviation: f64,
}

/// What went wrong in a configuration that did not finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub description: String,
    /// The `n` being attempted when the failure occurred; `None` when the
    /// configuration failed before any `n` was probed.
    pub context: Option<u32>,
}

impl ErrorRecord {
    /// Placeholder used by CSV export rows without an error.
    pub fn empty() -> Self {
        Self {
            description: String::new(),
            context: None,
        }
    }
}

/// Outcome of one enumerated configuration.
///
/// Always present, failed or not: `computed` keeps every point obtained
/// before a mid-sequence failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub id: String,
    pub series: SeriesRecord,
    pub accel: AccelRecord,
    pub computed: Vec<ComputedPoint>,
    pub error: Option<ErrorRecord>,
}

/// Convergence-quality anomaly kinds the scanner can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SlowAcceleration,
    DivergentAcceleration,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::SlowAcceleration => "slow_acceleration",
            EventKind::DivergentAcceleration => "divergent_acceleration",
        }
    }
}

/// A flagged anomaly, carrying the offending point for diagnostic replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEvent {
    pub result_id: String,
    pub kind: EventKind,
    pub data: ComputedPoint,
}
