//! Generic records flowing through the list pipeline.
//!
//! A [`Record`] is one backend entity (paper, user, friend request, comment)
//! kept as an open JSON object so every screen can share the same fetch,
//! enrich, filter and paginate stages. Nested replies are held as an ordered
//! list of child records rather than as a raw JSON array.
//!
//! Records are never edited in place once a stage emits them. The `with_*`
//! builders consume the record and hand back the updated value.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Result;

/// Field holding the stable identity of a record.
pub const ID_FIELD: &str = "id";

/// Field holding nested child records (comment replies).
pub const CHILDREN_FIELD: &str = "children";

/// Marker emitted on records whose enrichment lookup failed.
pub const ENRICHMENT_ERROR_FIELD: &str = "enrichmentError";

/// Field used when a scalar payload is wrapped into a record.
pub const VALUE_FIELD: &str = "value";

// =============================================================================
// RECORD KEY
// =============================================================================

/// Normalised record identity.
///
/// The backend mixes numeric and string identifiers; both normalise to their
/// textual form so `7` and `"7"` address the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build a key from a JSON value. Only strings and numbers qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RecordKey::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a string or numeric id, got {}", value))
        })
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordKey {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One domain entity instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
    children: Vec<Record>,
    enrichment_error: bool,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert any JSON value into a record.
    ///
    /// Objects keep their fields; a `children` array becomes child records and
    /// an `enrichmentError` flag is lifted into the marker. Any other value is
    /// wrapped as `{"value": <value>}`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let children = match fields.remove(CHILDREN_FIELD) {
                    Some(Value::Array(items)) => items.into_iter().map(Record::from_value).collect(),
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        // Not a reply list; keep it as a plain field.
                        fields.insert(CHILDREN_FIELD.to_string(), other);
                        Vec::new()
                    }
                };
                let enrichment_error = matches!(
                    fields.remove(ENRICHMENT_ERROR_FIELD),
                    Some(Value::Bool(true))
                );
                Self {
                    fields,
                    children,
                    enrichment_error,
                }
            }
            other => {
                let mut fields = Map::new();
                fields.insert(VALUE_FIELD.to_string(), other);
                Self {
                    fields,
                    ..Self::default()
                }
            }
        }
    }

    /// Serialize a typed model into a record.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        Ok(Self::from_value(serde_json::to_value(model)?))
    }

    /// Decode the record into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// Render the record back into a flat JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        if !self.children.is_empty() {
            object.insert(
                CHILDREN_FIELD.to_string(),
                Value::Array(self.children.iter().map(Record::to_value).collect()),
            );
        }
        if self.enrichment_error {
            object.insert(ENRICHMENT_ERROR_FIELD.to_string(), Value::Bool(true));
        }
        Value::Object(object)
    }

    /// Identity of the record, if it carries a usable `id`.
    pub fn key(&self) -> Option<RecordKey> {
        self.fields.get(ID_FIELD).and_then(RecordKey::from_value)
    }

    /// Key taken from an arbitrary top-level field (e.g. `userId`).
    pub fn key_of(&self, field: &str) -> Option<RecordKey> {
        self.fields.get(field).and_then(RecordKey::from_value)
    }

    /// Top-level field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True when a top-level field is absent or `null`.
    pub fn is_missing(&self, field: &str) -> bool {
        matches!(self.fields.get(field), None | Some(Value::Null))
    }

    /// Resolve a dotted path (`user.username`), fanning out over arrays.
    ///
    /// A trailing array is flattened one level, so `authors.username` over
    /// `{"authors": [{"username": "a"}, {"username": "b"}]}` yields both names.
    pub fn lookup(&self, path: &str) -> Vec<&Value> {
        let mut segments = path.split('.');
        let mut current: Vec<&Value> = match segments.next() {
            Some(first) => self.fields.get(first).into_iter().collect(),
            None => return Vec::new(),
        };
        for segment in segments {
            current = current
                .into_iter()
                .flat_map(|value| descend(value, segment))
                .collect();
        }
        current
            .into_iter()
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .collect()
    }

    /// Textual renderings of the values at `path`. Strings verbatim, numbers
    /// in decimal; booleans, nulls and objects contribute nothing.
    pub fn text_values(&self, path: &str) -> Vec<String> {
        self.lookup(path)
            .into_iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn children(&self) -> &[Record] {
        &self.children
    }

    pub fn enrichment_error(&self) -> bool {
        self.enrichment_error
    }

    /// Set a top-level field.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Replace the child records.
    pub fn with_children(mut self, children: Vec<Record>) -> Self {
        self.children = children;
        self
    }

    /// Set or clear the enrichment failure marker.
    pub fn with_enrichment_error(mut self, failed: bool) -> Self {
        self.enrichment_error = failed;
        self
    }

    /// Detach the child records, returning the childless record and them.
    pub fn split_children(mut self) -> (Self, Vec<Record>) {
        let children = std::mem::take(&mut self.children);
        (self, children)
    }

    /// Number of records in this subtree, the record itself included.
    pub fn tree_len(&self) -> usize {
        1 + self.children.iter().map(Record::tree_len).sum::<usize>()
    }
}

fn descend<'a>(value: &'a Value, segment: &str) -> Vec<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(|item| descend(item, segment)).collect(),
        _ => Vec::new(),
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::from_value(value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Record::from_value)
    }
}
