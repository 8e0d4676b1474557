//! Case data: remote CSV series, their local cache and the queries on top.
//!
//! - `transport`: HTTP GET primitive (`Fetch`)
//! - `cache`: TTL-bounded per-endpoint cache files (`ResourceCache`)
//! - `matrix`: validated time-series table (`TimeSeriesMatrix`)
//! - `database`: active-case queries across series (`Database`)

pub mod cache;
pub mod database;
pub mod matrix;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use cache::{Resource, ResourceCache, ResourceState};
pub use database::{Database, Snapshot};
pub use matrix::TimeSeriesMatrix;
pub use transport::{Fetch, HttpFetcher};
