//! Compounded growth arithmetic.
//!
//! All functions are plain `f64` math over any unit of period (days, weeks, ...).
//! Degenerate inputs (zero or negative counts, zero periods, rates of 1) are not
//! special-cased: the result follows IEEE-754 and may be `NaN` or infinite.

/// Per-period multiplicative growth factor from `past` to `current` over `period`.
///
/// `rate = (current / past) ^ (1 / period)`
pub fn rate(past: f64, current: f64, period: f64) -> f64 {
    (current / past).powf(1.0 / period)
}

/// Project `current` over `period` at a constant `rate` (negative periods go back in time).
pub fn forecast(current: f64, rate: f64, period: f64) -> f64 {
    current * rate.powf(period)
}

/// Periods needed to move from `current` to `target` at a constant `rate`.
pub fn period(current: f64, target: f64, rate: f64) -> f64 {
    (target / current).ln() / rate.ln()
}

/// Project `current` over `period` when the rate itself compounds by `rate_of_rate`
/// each period.
///
/// After `n` periods the running rate is `rate * rate_of_rate^n`, so the product of
/// all running rates is `rate^n * rate_of_rate^(1 + 2 + ... + n)`.
pub fn forecast_3d(current: f64, rate: f64, rate_of_rate: f64, period: f64) -> f64 {
    let triangular = (period * period + period) / 2.0;
    current * rate.powf(period) * rate_of_rate.powf(triangular)
}

/// Percentage change from `current` to `forecast` (e.g. `15.0` for +15%).
pub fn growth_percent(current: f64, forecast: f64) -> f64 {
    (forecast / current - 1.0) * 100.0
}
