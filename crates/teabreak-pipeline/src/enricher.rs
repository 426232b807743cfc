//! Enricher: fills in fields the list payload lacks via secondary lookups.
//!
//! An [`EnrichmentSpec`] names the key field to look up by, where the resolved
//! value goes, and the [`Resolver`] that performs the lookup. Lookups for one
//! call are collected across the whole record tree (comment replies
//! included), de-duplicated per key and awaited together; the tree is then
//! rebuilt in its original order.
//!
//! A failed lookup never fails the call. The affected record gets `null` in
//! every declared field and its enrichment error marker set.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, trace, warn};

use teabreak_core::{Record, RecordKey, Resolver};

/// Declares one enrichment: which records need it and how to resolve it.
#[derive(Clone)]
pub struct EnrichmentSpec {
    /// Field whose value is passed to the resolver (`userId`, `id`).
    pub key_field: String,
    /// Field that receives the whole resolved value.
    pub target_field: Option<String>,
    /// Fields copied from a resolved object onto the record.
    pub projected_fields: Vec<String>,
    pub resolver: Arc<dyn Resolver>,
}

impl fmt::Debug for EnrichmentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentSpec")
            .field("key_field", &self.key_field)
            .field("target_field", &self.target_field)
            .field("projected_fields", &self.projected_fields)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

impl EnrichmentSpec {
    /// Resolve `key_field` and store the result under `target_field`.
    pub fn nest(
        key_field: impl Into<String>,
        target_field: impl Into<String>,
        resolver: Arc<dyn Resolver>,
    ) -> Self {
        Self {
            key_field: key_field.into(),
            target_field: Some(target_field.into()),
            projected_fields: Vec::new(),
            resolver,
        }
    }

    /// Resolve `key_field` and copy the listed fields of the result.
    pub fn project(key_field: impl Into<String>, fields: &[&str], resolver: Arc<dyn Resolver>) -> Self {
        Self {
            key_field: key_field.into(),
            target_field: None,
            projected_fields: fields.iter().map(|f| f.to_string()).collect(),
            resolver,
        }
    }

    /// Additionally copy the listed fields of the resolved object.
    pub fn with_projection(mut self, fields: &[&str]) -> Self {
        self.projected_fields
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    fn declared_fields(&self) -> impl Iterator<Item = &str> {
        self.target_field
            .as_deref()
            .into_iter()
            .chain(self.projected_fields.iter().map(String::as_str))
    }

    /// A record needs enrichment when any declared field is absent or null.
    pub fn needs(&self, record: &Record) -> bool {
        self.declared_fields().any(|field| record.is_missing(field))
    }

    fn apply_resolved(&self, record: Record, resolved: &Value) -> Record {
        let mut record = record;
        if let Some(target) = &self.target_field {
            record = record.with_field(target.clone(), resolved.clone());
        }
        for field in &self.projected_fields {
            let value = resolved.get(field).cloned().unwrap_or(Value::Null);
            record = record.with_field(field.clone(), value);
        }
        record
    }

    fn apply_failure(&self, record: Record) -> Record {
        let mut record = record;
        for field in self.declared_fields() {
            record = record.with_field(field.to_string(), Value::Null);
        }
        record.with_enrichment_error(true)
    }
}

/// Enrich records with one spec. Output order equals input order.
pub async fn enrich(records: Vec<Record>, spec: &EnrichmentSpec) -> Vec<Record> {
    let start = Instant::now();

    let mut keys = Vec::new();
    let mut seen = HashSet::new();
    for record in &records {
        collect_keys(record, spec, &mut keys, &mut seen);
    }

    let lookups = join_all(keys.iter().map(|key| {
        let resolver = Arc::clone(&spec.resolver);
        async move {
            let result = resolver.resolve(key).await;
            (key.clone(), result)
        }
    }))
    .await;

    let mut resolved: HashMap<RecordKey, Value> = HashMap::new();
    let mut failed = 0usize;
    for (key, result) in lookups {
        match result {
            Ok(Value::Null) => {
                failed += 1;
                warn!(
                    record_key = %key,
                    component = spec.resolver.name(),
                    "Lookup returned no data"
                );
            }
            Ok(value) => {
                trace!(record_key = %key, "Lookup resolved");
                resolved.insert(key, value);
            }
            Err(e) => {
                failed += 1;
                warn!(
                    record_key = %key,
                    component = spec.resolver.name(),
                    error = %e,
                    "Lookup failed"
                );
            }
        }
    }

    let output: Vec<Record> = records
        .into_iter()
        .map(|record| rebuild(record, spec, &resolved))
        .collect();

    debug!(
        component = spec.resolver.name(),
        target_field = spec.target_field.as_deref().unwrap_or(spec.key_field.as_str()),
        lookup_count = keys.len(),
        failed_count = failed,
        record_count = output.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Enrichment complete"
    );

    output
}

/// Apply several specs one after another.
pub async fn enrich_all(records: Vec<Record>, specs: &[EnrichmentSpec]) -> Vec<Record> {
    let mut records = records;
    for spec in specs {
        records = enrich(records, spec).await;
    }
    records
}

fn collect_keys(
    record: &Record,
    spec: &EnrichmentSpec,
    keys: &mut Vec<RecordKey>,
    seen: &mut HashSet<RecordKey>,
) {
    if spec.needs(record) {
        if let Some(key) = record.key_of(&spec.key_field) {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }
    for child in record.children() {
        collect_keys(child, spec, keys, seen);
    }
}

/// Children are rebuilt before their parent.
fn rebuild(record: Record, spec: &EnrichmentSpec, resolved: &HashMap<RecordKey, Value>) -> Record {
    let (record, children) = record.split_children();
    let children: Vec<Record> = children
        .into_iter()
        .map(|child| rebuild(child, spec, resolved))
        .collect();

    let record = if spec.needs(&record) {
        match record
            .key_of(&spec.key_field)
            .and_then(|key| resolved.get(&key))
        {
            Some(value) => spec.apply_resolved(record, value),
            None => spec.apply_failure(record),
        }
    } else {
        record
    };

    record.with_children(children)
}
