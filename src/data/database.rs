//! Domain queries over the cached case series.
//!
//! The first resource registered with [`Database::set`] is the totalizing series
//! (e.g. confirmed cases); every other resource is subtracted from it to give
//! active cases.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::data::cache::ResourceCache;
use crate::data::matrix::TimeSeriesMatrix;
use crate::data::transport::Fetch;
use crate::error::{AppError, ErrorKind};

const CONTEXT: &str = "database";

pub struct Database {
    origin: String,
    ttl: Duration,
    cache: ResourceCache,
    first: Option<String>,
}

impl Database {
    /// `origin` is the base URL shared by every endpoint; `cache_dir` holds one
    /// file per endpoint, refreshed once older than `ttl`.
    pub fn new(
        origin: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
        ttl: Duration,
        fetcher: Box<dyn Fetch>,
    ) -> Self {
        Self {
            origin: origin.into(),
            ttl,
            cache: ResourceCache::new(cache_dir, fetcher),
            first: None,
        }
    }

    /// Register a named endpoint under the origin.
    pub fn set(&mut self, name: &str, endpoint: &str) {
        let url = format!(
            "{}/{}",
            self.origin.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        self.cache.configure(name, &url, self.ttl);
        if self.first.is_none() {
            self.first = Some(name.to_string());
        }
    }

    /// Date of the most recent column of the totalizing series.
    pub fn latest(&mut self) -> Result<NaiveDate, AppError> {
        Ok(self.total()?.latest())
    }

    /// Regions listed by the totalizing series, sorted.
    pub fn countries(&mut self) -> Result<Vec<String>, AppError> {
        Ok(self.total()?.countries())
    }

    /// Totalizing count minus every other series for `region` on `date`.
    ///
    /// Not clamped: inconsistent upstream data can make this negative.
    pub fn active_cases(&mut self, region: &str, date: NaiveDate) -> Result<i64, AppError> {
        self.snapshot()?.active_cases(region, date)
    }

    /// Load every registered series and freeze them for read-only queries.
    pub fn snapshot(&mut self) -> Result<Snapshot, AppError> {
        let total = self.total()?;
        let first = self.first.clone().unwrap_or_default();
        let names: Vec<String> = self
            .cache
            .names()
            .filter(|name| *name != first)
            .map(str::to_string)
            .collect();

        let mut subtracted = Vec::with_capacity(names.len());
        for name in &names {
            subtracted.push(self.cache.get(name).map_err(|e| e.context(CONTEXT))?);
        }

        Ok(Snapshot { total, subtracted })
    }

    fn total(&mut self) -> Result<Arc<TimeSeriesMatrix>, AppError> {
        let Some(first) = self.first.as_deref() else {
            return Err(AppError::new(ErrorKind::UnknownResource, "no resources registered").context(CONTEXT));
        };
        self.cache.get(first).map_err(|e| e.context(CONTEXT))
    }
}

/// Immutable set of loaded series; cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Snapshot {
    total: Arc<TimeSeriesMatrix>,
    subtracted: Vec<Arc<TimeSeriesMatrix>>,
}

impl Snapshot {
    pub fn latest(&self) -> NaiveDate {
        self.total.latest()
    }

    pub fn countries(&self) -> Vec<String> {
        self.total.countries()
    }

    pub fn active_cases(&self, region: &str, date: NaiveDate) -> Result<i64, AppError> {
        let mut cases = self
            .total
            .cases(region, date)
            .map_err(|e| e.context(CONTEXT))?;
        for matrix in &self.subtracted {
            let removed = matrix.cases(region, date).map_err(|e| e.context(CONTEXT))?;
            cases = cases.checked_sub(removed).ok_or_else(|| {
                AppError::new(ErrorKind::MalformedData, format!("active case overflow for '{region}' on {date}"))
                    .context(CONTEXT)
            })?;
        }
        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock::MockFetcher;

    const CONFIRMED: &str = include_str!("../../testdata/confirmed.csv");
    const RECOVERED: &str = include_str!("../../testdata/recovered.csv");
    const DEAD: &str = include_str!("../../testdata/dead.csv");

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture_fetcher() -> MockFetcher {
        MockFetcher::new()
            .with("/confirmed.csv", CONFIRMED)
            .with("/recovered.csv", RECOVERED)
            .with("/deaths.csv", DEAD)
    }

    fn database(dir: &std::path::Path, fetcher: &MockFetcher, ttl: Duration) -> Database {
        let mut db = Database::new("http://origin/", dir, ttl, Box::new(fetcher.clone()));
        db.set("confirmed", "/confirmed.csv");
        db.set("recovered", "/recovered.csv");
        db.set("dead", "/deaths.csv");
        db
    }

    #[test]
    fn queries_across_expirations() {
        for ttl in [
            Duration::from_secs(3600),
            Duration::from_millis(300),
            Duration::from_millis(10),
            Duration::ZERO,
        ] {
            let dir = tempfile::tempdir().unwrap();
            let fetcher = fixture_fetcher();
            let mut db = database(dir.path(), &fetcher, ttl);

            assert_eq!(db.latest().unwrap(), date(2020, 3, 3), "ttl {ttl:?}");
            assert_eq!(db.active_cases("italy", date(2020, 3, 3)).unwrap(), 2263, "ttl {ttl:?}");

            let countries = db.countries().unwrap();
            assert_eq!(countries.len(), 5);
            assert_eq!(countries[0], "Afghanistan");
            assert_eq!(countries[countries.len() - 1], "Zambia");

            // One fetch per series, however many queries.
            assert_eq!(fetcher.calls(), 3, "ttl {ttl:?}");
        }
    }

    #[test]
    fn global_active_cases_subtract_all_series() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fixture_fetcher();
        let mut db = database(dir.path(), &fetcher, Duration::from_secs(3600));

        let confirmed = 2502 + 1 + 67332 + 414 + 2 + 706;
        let recovered = 160 + 38556 + 297 + 10;
        let dead = 79 + 2871 + 8 + 6;
        assert_eq!(
            db.active_cases("", date(2020, 3, 3)).unwrap(),
            confirmed - recovered - dead
        );
    }

    #[test]
    fn active_cases_are_not_clamped() {
        let csv_total = "s,r,lat,long,1/22/20\n,x,1.0,2.0,3\n";
        let csv_gone = "s,r,lat,long,1/22/20\n,x,1.0,2.0,5\n";
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new().with("/a.csv", csv_total).with("/b.csv", csv_gone);
        let mut db = Database::new("http://origin", dir.path(), Duration::from_secs(60), Box::new(fetcher));
        db.set("a", "a.csv");
        db.set("b", "b.csv");

        assert_eq!(db.active_cases("x", date(2020, 1, 22)).unwrap(), -2);
    }

    #[test]
    fn subtraction_overflow_is_malformed() {
        let csv_total = "s,r,lat,long,1/22/20\n,x,1.0,2.0,-9223372036854775808\n";
        let csv_gone = "s,r,lat,long,1/22/20\n,x,1.0,2.0,1\n";
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new().with("/a.csv", csv_total).with("/b.csv", csv_gone);
        let mut db = Database::new("http://origin", dir.path(), Duration::from_secs(60), Box::new(fetcher));
        db.set("a", "a.csv");
        db.set("b", "b.csv");

        let err = db.active_cases("x", date(2020, 1, 22)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(err.to_string().starts_with("database: "), "{err}");
    }

    #[test]
    fn snapshot_matches_direct_queries() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fixture_fetcher();
        let mut db = database(dir.path(), &fetcher, Duration::from_secs(3600));

        let snapshot = db.snapshot().unwrap();
        for country in snapshot.countries() {
            let d = snapshot.latest();
            assert_eq!(
                snapshot.active_cases(&country, d).unwrap(),
                db.active_cases(&country, d).unwrap()
            );
        }
    }

    #[test]
    fn empty_database_reports_unknown_resource() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::new("http://origin", dir.path(), Duration::ZERO, Box::new(MockFetcher::new()));

        let err = db.latest().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownResource);
        assert!(err.to_string().starts_with("database: "));
    }

    #[test]
    fn failing_subtracted_series_fails_the_query() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new().with("/confirmed.csv", CONFIRMED);
        let mut db = database(dir.path(), &fetcher, Duration::from_secs(3600));

        // The totalizing series alone is enough for these.
        assert_eq!(db.latest().unwrap(), date(2020, 3, 3));
        let err = db.active_cases("italy", date(2020, 3, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
    }
}
