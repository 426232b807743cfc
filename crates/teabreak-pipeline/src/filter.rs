//! Search and facet filtering over records.
//!
//! Free-text search is case-insensitive substring matching over a declared
//! set of field paths, OR-combined. Facets are exact restrictions on single
//! fields, AND-combined with each other and with the search.

use std::collections::BTreeSet;

use serde::Serialize;

use teabreak_core::defaults::FACET_ALL;
use teabreak_core::Record;

// =============================================================================
// FREE-TEXT SEARCH
// =============================================================================

/// Search text plus the fields it is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    /// Dotted field paths, e.g. `title` or `authors.username`.
    pub fields: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            text: text.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn needle(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// True when the trimmed text is empty, i.e. the query matches everything.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        let needle = self.needle();
        needle.is_empty() || self.matches_needle(record, &needle)
    }

    fn matches_needle(&self, record: &Record, needle: &str) -> bool {
        self.fields.iter().any(|field| {
            record
                .text_values(field)
                .iter()
                .any(|value| value.to_lowercase().contains(needle))
        })
    }
}

/// Keep records matching the query, in their original order.
///
/// A missing or blank query keeps everything.
pub fn filter(records: &[Record], query: Option<&SearchQuery>) -> Vec<Record> {
    match query {
        Some(query) if !query.is_blank() => {
            let needle = query.needle();
            records
                .iter()
                .filter(|record| query.matches_needle(record, &needle))
                .cloned()
                .collect()
        }
        _ => records.to_vec(),
    }
}

// =============================================================================
// FACETS
// =============================================================================

/// How a facet compares its value with the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetMode {
    /// Field text contains the value (conference filter).
    Contains,
    /// Field text equals the value (year filter).
    Equals,
}

/// A structured restriction on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub field: String,
    pub value: String,
    pub mode: FacetMode,
}

impl Facet {
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            mode: FacetMode::Contains,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            mode: FacetMode::Equals,
        }
    }

    /// `"all"` and empty values impose no restriction.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty() && self.value != FACET_ALL
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }
        record.text_values(&self.field).iter().any(|text| match self.mode {
            FacetMode::Contains => text.contains(&self.value),
            FacetMode::Equals => text == &self.value,
        })
    }
}

/// Keep records matching every active facet.
pub fn apply_facets(records: &[Record], facets: &[Facet]) -> Vec<Record> {
    let active: Vec<&Facet> = facets.iter().filter(|f| f.is_active()).collect();
    if active.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| active.iter().all(|facet| facet.matches(record)))
        .cloned()
        .collect()
}

/// Distinct values of a field across records, sorted, for facet selectors.
pub fn facet_values(records: &[Record], field: &str) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.text_values(field))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
