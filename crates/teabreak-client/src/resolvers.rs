//! Backend lookups used to enrich list records.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use teabreak_core::{RecordKey, Resolver, Result};

use crate::http::HttpBackend;

/// Resolves a user id to the profile from `/Users/GetInfoById`.
#[derive(Debug, Clone)]
pub struct UserById {
    backend: Arc<HttpBackend>,
}

impl UserById {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Resolver for UserById {
    fn name(&self) -> &str {
        "user_by_id"
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        self.backend
            .get("/Users/GetInfoById", &[("id", key.to_string())])
            .await?
            .into_data()
    }
}

/// Resolves a paper id to its author list from `/PaperAuthor/GetAuthorList`.
///
/// A paper with no related authors resolves to an empty list.
#[derive(Debug, Clone)]
pub struct PaperAuthors {
    backend: Arc<HttpBackend>,
}

impl PaperAuthors {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Resolver for PaperAuthors {
    fn name(&self) -> &str {
        "paper_authors"
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        let data = self
            .backend
            .get("/PaperAuthor/GetAuthorList", &[("paperId", key.to_string())])
            .await?
            .into_data()?;
        Ok(match data {
            Value::Null => Value::Array(Vec::new()),
            other => other,
        })
    }
}

/// Which counter a [`PaperCounter`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
}

impl Counter {
    fn path(self) -> &'static str {
        match self {
            Counter::Views => "/PaperStatus/GetViewCount",
            Counter::Downloads => "/PaperStatus/GetDownloadCount",
        }
    }
}

/// Resolves a paper id to one of its statistics counters.
///
/// The backend returns `null` for papers nobody has opened yet; that counts
/// as zero.
#[derive(Debug, Clone)]
pub struct PaperCounter {
    backend: Arc<HttpBackend>,
    counter: Counter,
}

impl PaperCounter {
    pub fn views(backend: Arc<HttpBackend>) -> Self {
        Self {
            backend,
            counter: Counter::Views,
        }
    }

    pub fn downloads(backend: Arc<HttpBackend>) -> Self {
        Self {
            backend,
            counter: Counter::Downloads,
        }
    }
}

#[async_trait]
impl Resolver for PaperCounter {
    fn name(&self) -> &str {
        match self.counter {
            Counter::Views => "paper_views",
            Counter::Downloads => "paper_downloads",
        }
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        let data = self
            .backend
            .get(self.counter.path(), &[("paperId", key.to_string())])
            .await?
            .into_data()?;
        Ok(match data {
            Value::Null => Value::from(0),
            other => other,
        })
    }
}
