//! Reporting utilities: formatted terminal output for sweeps.

pub mod format;

pub use format::*;
