//! Input/output helpers.
//!
//! - sweep-file loading + descriptor resolution (`config`)
//! - array-backed series from CSV rows (`ingest`)
//! - result/event exports (JSON/CSV) (`export`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
