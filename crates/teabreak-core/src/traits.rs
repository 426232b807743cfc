//! Core traits for TeaBreak client abstractions.
//!
//! These traits define the seams between the list pipeline and the backend,
//! so the pipeline can run against the HTTP client or an in-memory stand-in.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::record::{Record, RecordKey};

// =============================================================================
// RETRIEVAL DESCRIPTORS
// =============================================================================

/// HTTP verb of a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// Describes one list retrieval ("all papers", "received friend requests").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Stable name used in logs and failure reports.
    pub name: String,
    pub method: Method,
    /// Backend path, e.g. `/Papers/GetAllPapers`.
    pub path: String,
    /// Query parameters (GET) or form fields (POST).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
}

impl Descriptor {
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: Method::Post,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =============================================================================
// RETRIEVAL
// =============================================================================

/// Outcome status of one retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStatus {
    Success,
    Failure,
}

/// Normalised answer of the backend to one descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    pub status: RetrievalStatus,
    pub data: Option<Vec<Record>>,
    pub message: Option<String>,
}

impl Retrieval {
    pub fn success(records: Vec<Record>) -> Self {
        Self {
            status: RetrievalStatus::Success,
            data: Some(records),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: RetrievalStatus::Failure,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RetrievalStatus::Success
    }
}

/// Capability to run list retrievals against the backend.
///
/// Transport problems (timeouts, refused connections) are reported as a
/// [`RetrievalStatus::Failure`], never as a panic or an `Err`.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, descriptor: &Descriptor) -> Retrieval;
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for Arc<T> {
    async fn retrieve(&self, descriptor: &Descriptor) -> Retrieval {
        (**self).retrieve(descriptor).await
    }
}

// =============================================================================
// RESOLVERS
// =============================================================================

/// Secondary lookup that fills in a field missing from the list payload,
/// e.g. a user id resolved to a profile.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn resolve(&self, key: &RecordKey) -> Result<Value>;
}

#[async_trait]
impl<T: Resolver + ?Sized> Resolver for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        (**self).resolve(key).await
    }
}
