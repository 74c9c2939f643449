//! Domain types used throughout the trial engine.
//!
//! This module defines:
//!
//! - argument values and assignments (`ParamValue`, `Assignment`, `Axes`)
//! - capability interfaces for injected collaborators (`ReadySeries`,
//!   `Accelerator` and their factories)
//! - descriptors of what to sweep (`SeriesDescriptor`, `AccelDescriptor`)
//! - serializable trial records (`TrialResult`, `ComputedPoint`,
//!   `ErrorRecord`, `TrialEvent`)

pub mod types;
pub mod value;

pub use types::*;
pub use value::*;
