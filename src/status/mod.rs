//! Epidemic control status: classification and per-region assessment.

pub mod assessment;
pub mod classify;

pub use assessment::*;
pub use classify::*;
