//! Test helpers for pipeline integration tests.
//!
//! Provides scripted stand-ins for the backend and small record factories.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use teabreak_pipeline::{Descriptor, Error, Record, RecordKey, Resolver, Result, Retrieval, Retriever};

/// Retriever answering by descriptor name after an optional delay.
///
/// The script for a name can be replaced between runs to simulate the
/// backend changing under a screen.
#[derive(Default)]
pub struct ScriptedRetriever {
    script: Mutex<HashMap<String, (u64, Retrieval)>>,
    calls: AtomicUsize,
}

impl ScriptedRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, delay_ms: u64, retrieval: Retrieval) -> Self {
        self.set(name, delay_ms, retrieval);
        self
    }

    pub fn set(&self, name: &str, delay_ms: u64, retrieval: Retrieval) {
        self.script
            .lock()
            .unwrap()
            .insert(name.to_string(), (delay_ms, retrieval));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for ScriptedRetriever {
    async fn retrieve(&self, descriptor: &Descriptor) -> Retrieval {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.script.lock().unwrap().get(&descriptor.name).cloned();
        match entry {
            Some((delay_ms, retrieval)) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                retrieval
            }
            None => Retrieval::failure(format!("no script for {}", descriptor.name)),
        }
    }
}

/// Resolver backed by a fixed table of profiles. Unknown keys fail.
pub struct ProfileResolver {
    profiles: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl ProfileResolver {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            profiles: ids
                .iter()
                .map(|id| (id.to_string(), profile(id)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for ProfileResolver {
    fn name(&self) -> &str {
        "profiles"
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {}", key)))
    }
}

pub fn profile(id: &str) -> Value {
    json!({"id": id, "username": format!("user{}", id), "email": format!("user{}@tea.break", id)})
}

pub fn paper(id: u64, title: &str) -> Record {
    Record::from_value(json!({"id": id, "title": title}))
}

pub fn papers(count: u64) -> Vec<Record> {
    (1..=count).map(|i| paper(i, &format!("Paper {}", i))).collect()
}

pub fn keys(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.key())
        .map(|k| k.to_string())
        .collect()
}
