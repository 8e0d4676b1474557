//! Shared "assessment pipeline" used by the `status` and `top` commands.
//!
//! Database snapshot -> window resolution -> active counts at three dates ->
//! growth rates -> status.

use rayon::prelude::*;

use crate::data::{Database, Snapshot};
use crate::domain::{Counts, Window};
use crate::error::AppError;
use crate::status::{Assessment, rank};

/// Display name used when no country is given.
pub const WORLD: &str = "world";

/// Region filter for the matrices: "world" and empty both mean every row.
pub fn region_query(country: &str) -> &str {
    let country = country.trim();
    if country.eq_ignore_ascii_case(WORLD) { "" } else { country }
}

/// Assess one region from an already loaded snapshot.
pub fn assess(snapshot: &Snapshot, country: &str, window: &Window) -> Result<Assessment, AppError> {
    let region = region_query(country);
    let counts = Counts {
        compare: snapshot.active_cases(region, window.compare)?,
        since: snapshot.active_cases(region, window.since)?,
        latest: snapshot.active_cases(region, window.latest)?,
    };

    let name = if region.is_empty() { WORLD } else { region };
    Ok(Assessment::evaluate(&name.to_uppercase(), window, counts))
}

/// Assess every listed country in parallel and rank them best first
/// (or worst first with `worse`).
pub fn assess_all(db: &mut Database, days: i64, worse: bool) -> Result<Vec<Assessment>, AppError> {
    let snapshot = db.snapshot()?;
    let window = Window::resolve(snapshot.latest(), Some(days), None, None, None)?;

    let mut list = snapshot
        .countries()
        .par_iter()
        .map(|country| assess(&snapshot, country, &window))
        .collect::<Result<Vec<_>, _>>()?;

    rank(&mut list);
    if worse {
        list.reverse();
    }
    Ok(list)
}
