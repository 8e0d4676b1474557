//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the control status scale (`Status`)
//! - the sampling windows and the counts taken at them (`Window`, `Counts`)

pub mod types;

pub use types::*;
