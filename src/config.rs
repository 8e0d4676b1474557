//! Runtime settings: data origin, cache location, TTL and endpoint list.
//!
//! Values come from (lowest to highest priority) built-in defaults, a `.env`
//! file, process environment, then CLI flags.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::data::{Database, HttpFetcher};
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_ORIGIN: &str = "https://raw.githubusercontent.com/bumbeishvili/covid19-daily-data";
pub const DEFAULT_TTL_HOURS: u64 = 8;
const PROFILE_DIR: &str = ".covid";

const ENV_ORIGIN: &str = "COVID_ORIGIN";
const ENV_CACHE_DIR: &str = "COVID_CACHE_DIR";
const ENV_TTL_HOURS: &str = "COVID_CACHE_TTL_HOURS";

/// A named series under the origin. The first endpoint is the totalizing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub path: String,
}

impl Endpoint {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub origin: String,
    pub cache_dir: PathBuf,
    pub ttl: Duration,
    pub endpoints: Vec<Endpoint>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let origin = lookup(ENV_ORIGIN).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        let cache_dir = match lookup(ENV_CACHE_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = lookup("HOME").ok_or_else(|| {
                    AppError::new(
                        ErrorKind::Usage,
                        format!("cannot determine the home directory; set {ENV_CACHE_DIR}"),
                    )
                })?;
                PathBuf::from(home).join(PROFILE_DIR)
            }
        };

        let ttl = match lookup(ENV_TTL_HOURS) {
            Some(raw) => parse_ttl_hours(&raw)?,
            None => Duration::from_secs(DEFAULT_TTL_HOURS * 3600),
        };

        Ok(Self {
            origin,
            cache_dir,
            ttl,
            endpoints: default_endpoints(),
        })
    }

    /// Create the cache directory if needed (owner-only on unix).
    pub fn ensure_cache_dir(&self) -> Result<(), AppError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.cache_dir).map_err(|e| {
            AppError::new(
                ErrorKind::Io,
                format!("failed to create cache dir '{}': {e}", self.cache_dir.display()),
            )
        })
    }

    /// Database over HTTP with every endpoint registered, in order.
    pub fn open_database(&self) -> Result<Database, AppError> {
        self.ensure_cache_dir()?;
        debug!(origin = %self.origin, cache_dir = %self.cache_dir.display(), ttl_secs = self.ttl.as_secs(), "opening database");

        let mut db = Database::new(
            self.origin.clone(),
            self.cache_dir.clone(),
            self.ttl,
            Box::new(HttpFetcher::new()?),
        );
        for endpoint in &self.endpoints {
            db.set(&endpoint.name, &endpoint.path);
        }
        Ok(db)
    }
}

pub fn default_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("confirmed", "/master/time_series_19-covid-Confirmed.csv"),
        Endpoint::new("recovered", "/master/time_series_19-covid-Recovered.csv"),
        Endpoint::new("dead", "/master/time_series_19-covid-Deaths.csv"),
    ]
}

pub fn parse_ttl_hours(raw: &str) -> Result<Duration, AppError> {
    let hours: f64 = raw.trim().parse().map_err(|_| {
        AppError::new(ErrorKind::Usage, format!("invalid cache TTL '{raw}' (expected hours)"))
    })?;
    if !(hours.is_finite() && hours >= 0.0) {
        return Err(AppError::new(
            ErrorKind::Usage,
            format!("invalid cache TTL '{raw}' (must be >= 0 hours)"),
        ));
    }
    Ok(Duration::from_secs_f64(hours * 3600.0))
}
