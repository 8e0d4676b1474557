//! Per-region growth assessment: rates, forecasts, recovery horizon and status.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Counts, Status, Window};
use crate::math::growth::{forecast, forecast_3d, growth_percent, period, rate};
use crate::status::classify::{RESOLVING_BELOW, classify, is_improving};

/// Everything derived from one region's counts over one window.
///
/// Values are raw `f64`s; degenerate inputs (zero counts, flat rates) show up as
/// `NaN` or infinities rather than errors.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub country: String,
    pub updated: NaiveDate,

    pub status: Status,
    pub score: u8,
    pub resolving: bool,
    /// Rate is slowing down but the status is not yet resolving.
    pub improving: bool,

    /// Daily growth factor over the primary window.
    pub rate: f64,
    pub active_cases: i64,

    /// Daily growth factor over the comparison window.
    pub comparison_rate: f64,
    /// Daily change of the growth factor between the two windows.
    pub rate_of_rates: f64,

    pub days_to_one_case: f64,
    pub days_to_recovery_start: f64,
    pub days_to_peak: f64,
    pub peak_cases: f64,

    pub forecast_cases: f64,
    pub forecast_growth: f64,
    pub forecast_days: i64,
}

impl Assessment {
    pub fn evaluate(country: &str, window: &Window, counts: Counts) -> Self {
        let latest = counts.latest as f64;
        let days = window.days as f64;

        let r = rate(counts.since as f64, latest, days);
        let forecast_cases = forecast(latest, r, window.forecast_days as f64);

        let r2 = rate(counts.compare as f64, latest, window.compare_days as f64);
        let r3 = rate(r2, r, (window.compare_days - window.days) as f64);

        let status = classify(r, r3);
        let resolving = status.is_resolving();

        let days_to_peak = period(r, 1.0, r3);

        Self {
            country: country.to_string(),
            updated: window.latest,
            status,
            score: status.score(),
            resolving,
            improving: is_improving(r3) && !resolving,
            rate: r,
            active_cases: counts.latest,
            comparison_rate: r2,
            rate_of_rates: r3,
            days_to_one_case: period(latest, 1.0, r),
            days_to_recovery_start: period(r, RESOLVING_BELOW, r3),
            days_to_peak,
            peak_cases: forecast_3d(latest, r, r3, days_to_peak),
            forecast_cases,
            forecast_growth: growth_percent(latest, forecast_cases),
            forecast_days: window.forecast_days,
        }
    }

    fn peak_ratio(&self) -> f64 {
        self.peak_cases / self.active_cases as f64
    }
}

/// Order best-controlled first.
///
/// Ties within a status break on the expected peak relative to today's cases for
/// the middle statuses (3 to 5), otherwise on rate and then rate of rates.
/// Floats compare with `total_cmp`, so `NaN` rates still give a consistent order.
pub fn rank(list: &mut [Assessment]) {
    list.sort_by(compare);
}

fn compare(a: &Assessment, b: &Assessment) -> Ordering {
    a.score.cmp(&b.score).then_with(|| {
        if (3..=5).contains(&a.score) {
            a.peak_ratio().total_cmp(&b.peak_ratio())
        } else {
            a.rate
                .total_cmp(&b.rate)
                .then_with(|| a.rate_of_rates.total_cmp(&b.rate_of_rates))
        }
    })
}
