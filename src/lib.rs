//! `covid-status` library crate.
//!
//! The binary (`covid`) is a thin wrapper around this library so that:
//!
//! - cache, data and growth logic are testable without spawning processes or
//!   touching the network
//! - the assessment can be reused by other front-ends

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod report;
pub mod status;
