//! Resolvers that need no backend round trip.

use async_trait::async_trait;
use serde_json::Value;

use teabreak_core::{parse_year, Error, RecordKey, Resolver, Result};

/// Derives a paper's `year` from its `createTime` timestamp.
///
/// Used as `EnrichmentSpec::nest("createTime", "year", ...)`: the key is the
/// timestamp text and the resolved value is the calendar year.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearFromTimestamp;

#[async_trait]
impl Resolver for YearFromTimestamp {
    fn name(&self) -> &str {
        "year_from_timestamp"
    }

    async fn resolve(&self, key: &RecordKey) -> Result<Value> {
        parse_year(key.as_str())
            .map(Value::from)
            .ok_or_else(|| Error::InvalidInput(format!("unrecognised timestamp: {}", key)))
    }
}
