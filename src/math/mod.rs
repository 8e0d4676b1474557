//! Mathematical utilities: compounded growth rates and projections.

pub mod growth;

pub use growth::*;
