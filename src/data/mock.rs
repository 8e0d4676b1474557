//! In-memory fetcher for tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::data::transport::Fetch;
use crate::error::{AppError, ErrorKind};

/// Serves fixed bodies keyed by URL suffix and counts every request.
///
/// Clones share the counter, so a test can hand one clone to the cache and
/// keep another to inspect.
#[derive(Clone, Default)]
pub struct MockFetcher {
    bodies: HashMap<String, String>,
    calls: Rc<Cell<usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, suffix: &str, body: &str) -> Self {
        self.bodies.insert(suffix.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Fetch for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.calls.set(self.calls.get() + 1);
        self.bodies
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone().into_bytes())
            .ok_or_else(|| AppError::new(ErrorKind::HttpStatus, "unexpected HTTP status: 404 Not Found"))
    }
}
