//! Combination expansion for parameter sweeps.
//!
//! Responsibilities:
//!
//! - cross named option axes into every concrete assignment (`expand_cartesian`)
//! - zip same-index values across named axes (`expand_parallel`)

pub mod expand;

pub use expand::*;
