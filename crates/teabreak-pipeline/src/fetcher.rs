//! Fetcher: runs retrieval descriptors and merges their records.
//!
//! All descriptors are issued together and awaited as a group. Output keeps
//! descriptor declaration order, then the order each source returned, with
//! later duplicates of an already-seen `id` dropped.

use std::collections::HashSet;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, trace, warn};

use teabreak_core::{Descriptor, Record, RecordKey, Retriever};

use crate::error::{FailedDescriptor, FetchError};

/// Records produced by a fetch that did not fail wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub records: Vec<Record>,
    /// Present when some (not all) descriptors failed.
    pub warning: Option<FetchError>,
}

/// Issues descriptors through a [`Retriever`]. Never caches between calls.
pub struct Fetcher<R> {
    retriever: R,
}

impl<R: Retriever> Fetcher<R> {
    pub fn new(retriever: R) -> Self {
        Self { retriever }
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Fetch and merge all descriptors.
    ///
    /// Fails only when every descriptor failed. An empty descriptor list
    /// yields an empty record list.
    pub async fn fetch(&self, descriptors: &[Descriptor]) -> Result<Fetched, FetchError> {
        let start = Instant::now();

        let retrievals = join_all(descriptors.iter().map(|d| self.retriever.retrieve(d))).await;

        let mut seen: HashSet<RecordKey> = HashSet::new();
        let mut records = Vec::new();
        let mut failed = Vec::new();

        for (descriptor, retrieval) in descriptors.iter().zip(retrievals) {
            if !retrieval.is_success() {
                warn!(
                    descriptor = %descriptor,
                    error = retrieval.message.as_deref().unwrap_or(""),
                    "Retrieval failed"
                );
                failed.push(FailedDescriptor {
                    descriptor: descriptor.name.clone(),
                    message: retrieval.message,
                });
                continue;
            }

            let batch = retrieval.data.unwrap_or_default();
            debug!(descriptor = %descriptor, record_count = batch.len(), "Retrieval complete");
            for record in batch {
                match record.key() {
                    Some(key) if !seen.insert(key.clone()) => {
                        trace!(record_key = %key, "Dropping duplicate record");
                    }
                    _ => records.push(record),
                }
            }
        }

        let elapsed = start.elapsed().as_millis() as u64;

        if !descriptors.is_empty() && failed.len() == descriptors.len() {
            warn!(
                failed_count = failed.len(),
                duration_ms = elapsed,
                "All retrievals failed"
            );
            return Err(FetchError::total(failed));
        }

        debug!(
            record_count = records.len(),
            failed_count = failed.len(),
            duration_ms = elapsed,
            "Fetch complete"
        );

        let warning = if failed.is_empty() {
            None
        } else {
            Some(FetchError::partial(failed))
        };
        Ok(Fetched { records, warning })
    }
}
