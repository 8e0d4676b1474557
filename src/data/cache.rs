//! Local, TTL-bounded copies of remote time series.
//!
//! Each resource is backed by `<cache_dir>/<name>.csv`. The file's mtime is the
//! only freshness signal: a file older than the TTL (or a missing file) is
//! refetched and overwritten, otherwise it is parsed as-is. Once parsed, a
//! matrix stays in memory for the lifetime of the cache with no further checks.
//!
//! The cache is single-threaded: `get` takes `&mut self` and two caches over the
//! same directory do not coordinate.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::data::matrix::TimeSeriesMatrix;
use crate::data::transport::Fetch;
use crate::error::{AppError, ErrorKind};

const FILE_EXT: &str = "csv";

/// Load state of a single resource.
#[derive(Debug, Clone)]
pub enum ResourceState {
    Unloaded,
    Loaded(Arc<TimeSeriesMatrix>),
}

/// One named remote endpoint and its cache file.
#[derive(Debug, Clone)]
pub struct Resource {
    pub name: String,
    pub url: String,
    pub path: PathBuf,
    pub ttl: Duration,
    pub state: ResourceState,
}

impl Resource {
    fn open(&self, fetcher: &dyn Fetch) -> Result<TimeSeriesMatrix, AppError> {
        if is_stale(&self.path, self.ttl)? {
            fetch_and_write(fetcher, &self.url, &self.path)?;
        } else {
            debug!(resource = %self.name, path = %self.path.display(), "cache file is fresh");
        }
        parse(&self.path)
    }
}

pub struct ResourceCache {
    dir: PathBuf,
    fetcher: Box<dyn Fetch>,
    resources: Vec<Resource>,
}

impl ResourceCache {
    pub fn new(dir: impl Into<PathBuf>, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
            resources: Vec::new(),
        }
    }

    /// Register (or replace) an endpoint. Replacing drops any loaded matrix.
    pub fn configure(&mut self, name: &str, url: &str, ttl: Duration) {
        let resource = Resource {
            name: name.to_string(),
            url: url.to_string(),
            path: self.dir.join(format!("{name}.{FILE_EXT}")),
            ttl,
            state: ResourceState::Unloaded,
        };
        match self.resources.iter_mut().find(|r| r.name == name) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Matrix for `name`, loading it from disk or the network on first use.
    pub fn get(&mut self, name: &str) -> Result<Arc<TimeSeriesMatrix>, AppError> {
        let fetcher = &*self.fetcher;
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| {
                AppError::new(ErrorKind::UnknownResource, format!("unknown resource name `{name}`"))
            })?;

        if let ResourceState::Loaded(matrix) = &resource.state {
            debug!(resource = name, "in-memory hit");
            return Ok(Arc::clone(matrix));
        }

        let matrix = Arc::new(resource.open(fetcher).map_err(|e| e.context("cache"))?);
        resource.state = ResourceState::Loaded(Arc::clone(&matrix));
        Ok(matrix)
    }
}

/// Missing files and files last modified more than `ttl` ago are stale.
fn is_stale(path: &Path, ttl: Duration) -> Result<bool, AppError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "cache file missing");
            return Ok(true);
        }
        Err(e) => return Err(io_error(path, e)),
    };
    let modified = metadata.modified().map_err(|e| io_error(path, e))?;

    // A clock that went backwards makes the file look brand new.
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    let stale = age > ttl;
    if stale {
        debug!(path = %path.display(), age_secs = age.as_secs(), ttl_secs = ttl.as_secs(), "cache file is stale");
    }
    Ok(stale)
}

/// Fetch `url` and overwrite `path` with the raw body.
fn fetch_and_write(fetcher: &dyn Fetch, url: &str, path: &Path) -> Result<(), AppError> {
    let body = fetcher.fetch(url)?;
    fs::write(path, &body).map_err(|e| io_error(path, e))?;
    info!(%url, path = %path.display(), bytes = body.len(), "fetched resource");
    Ok(())
}

fn parse(path: &Path) -> Result<TimeSeriesMatrix, AppError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    TimeSeriesMatrix::from_reader(BufReader::new(file))
        .map_err(|e| e.context(&format!("{}", path.display())))
}

fn io_error(path: &Path, err: io::Error) -> AppError {
    AppError::new(ErrorKind::Io, format!("{}: {err}", path.display()))
}
