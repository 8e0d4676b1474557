//! Reporting: text rendering of assessments and region lists.

pub mod format;

pub use format::*;
