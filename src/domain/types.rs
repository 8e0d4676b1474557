//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be
//! printed as text or exported as JSON without conversion layers.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, ErrorKind};

/// Default number of days to project forward.
pub const FORECAST_DAYS: i64 = 30;

/// Default measurement window, in days.
pub const DEFAULT_DAYS: i64 = 7;

/// Qualitative control status of an epidemic, ordered best to worst.
///
/// The discriminant is the public score (1 = resolving, 7 = out of control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Resolving = 1,
    ResolvingSlowly = 2,
    UnderControl = 3,
    BarelyUnderControl = 4,
    LoosingControl = 5,
    HardToControl = 6,
    OutOfControl = 7,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Resolving,
        Status::ResolvingSlowly,
        Status::UnderControl,
        Status::BarelyUnderControl,
        Status::LoosingControl,
        Status::HardToControl,
        Status::OutOfControl,
    ];

    pub fn score(self) -> u8 {
        self as u8
    }

    /// Lowercase phrase used in status sentences.
    pub fn label(self) -> &'static str {
        match self {
            Status::Resolving => "resolving",
            Status::ResolvingSlowly => "resolving slowly",
            Status::UnderControl => "under control",
            Status::BarelyUnderControl => "barely under control",
            Status::LoosingControl => "loosing control",
            Status::HardToControl => "hard to control",
            Status::OutOfControl => "out of control",
        }
    }

    pub fn is_resolving(self) -> bool {
        matches!(self, Status::Resolving | Status::ResolvingSlowly)
    }
}

/// Active case counts sampled at the three window dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub compare: i64,
    pub since: i64,
    pub latest: i64,
}

/// Dates and lengths of the primary and comparison windows.
///
/// The primary window runs `since..=latest` over `days`; the comparison window
/// runs `compare..=latest` over `compare_days` and is normally twice as long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub latest: NaiveDate,
    pub since: NaiveDate,
    pub compare: NaiveDate,
    pub days: i64,
    pub compare_days: i64,
    pub forecast_days: i64,
}

impl Window {
    /// Fill in whatever the caller left out.
    ///
    /// - an explicit `since` wins over `days`; otherwise `since = latest - days`
    ///   (`days` defaults to [`DEFAULT_DAYS`])
    /// - an explicit `compare` wins over `compare_days`; otherwise
    ///   `compare = latest - compare_days` (`compare_days` defaults to `2 * days`)
    pub fn resolve(
        latest: NaiveDate,
        days: Option<i64>,
        since: Option<NaiveDate>,
        compare_days: Option<i64>,
        compare: Option<NaiveDate>,
    ) -> Result<Self, AppError> {
        let (since, days) = match since {
            Some(since) => (since, (latest - since).num_days()),
            None => {
                let days = days.unwrap_or(DEFAULT_DAYS);
                (days_before(latest, days)?, days)
            }
        };
        if days <= 0 {
            return Err(AppError::new(
                ErrorKind::Usage,
                format!("the estimate window must end after it starts (since {since}, latest {latest})"),
            ));
        }

        let (compare, compare_days) = match compare {
            Some(compare) => (compare, (latest - compare).num_days()),
            None => {
                let compare_days = compare_days.unwrap_or(days * 2);
                (days_before(latest, compare_days)?, compare_days)
            }
        };

        Ok(Self {
            latest,
            since,
            compare,
            days,
            compare_days,
            forecast_days: FORECAST_DAYS,
        })
    }
}

fn days_before(latest: NaiveDate, days: i64) -> Result<NaiveDate, AppError> {
    Duration::try_days(days)
        .and_then(|d| latest.checked_sub_signed(d))
        .ok_or_else(|| AppError::new(ErrorKind::Usage, format!("{days} days before {latest} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn statuses_are_ordered_by_score() {
        let scores: Vec<u8> = Status::ALL.iter().map(|s| s.score()).collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(Status::Resolving < Status::OutOfControl);
        assert!(Status::ResolvingSlowly.is_resolving());
        assert!(!Status::UnderControl.is_resolving());
    }

    #[test]
    fn window_defaults_from_latest() {
        let w = Window::resolve(date(2020, 3, 19), None, None, None, None).unwrap();
        assert_eq!(w.days, 7);
        assert_eq!(w.since, date(2020, 3, 12));
        assert_eq!(w.compare_days, 14);
        assert_eq!(w.compare, date(2020, 3, 5));
        assert_eq!(w.forecast_days, FORECAST_DAYS);
    }

    #[test]
    fn explicit_since_sets_days() {
        let w = Window::resolve(date(2020, 3, 19), Some(3), Some(date(2020, 3, 9)), None, None).unwrap();
        assert_eq!(w.days, 10);
        assert_eq!(w.compare_days, 20);
        assert_eq!(w.compare, date(2020, 2, 28));
    }

    #[test]
    fn explicit_compare_sets_compare_days() {
        let w = Window::resolve(date(2020, 3, 19), Some(5), None, Some(9), Some(date(2020, 3, 1))).unwrap();
        assert_eq!(w.since, date(2020, 3, 14));
        assert_eq!(w.compare_days, 18);

        let w = Window::resolve(date(2020, 3, 19), Some(5), None, Some(9), None).unwrap();
        assert_eq!(w.compare, date(2020, 3, 10));
    }

    #[test]
    fn huge_day_counts_are_rejected() {
        let err = Window::resolve(date(2020, 3, 19), Some(i64::MAX), None, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn since_after_latest_is_rejected() {
        let err = Window::resolve(date(2020, 3, 19), None, Some(date(2020, 3, 20)), None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
