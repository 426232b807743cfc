//! Backend response envelope.
//!
//! Every endpoint answers `{"code": 200, "data": ..., "message": "..."}`.
//! Only `code == 200` is success; the HTTP status alone says nothing.

use serde::Deserialize;
use serde_json::Value;

use teabreak_core::defaults::SUCCESS_CODE;
use teabreak_core::{Error, Record, Result, Retrieval};

/// Key under which paged endpoints nest their rows.
const RECORDS_KEY: &str = "records";

/// Decoded `{code, data, message}` reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// The payload on success, a backend error otherwise.
    pub fn into_data(self) -> Result<Value> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::backend(self.code, self.message))
        }
    }

    /// The payload normalised to a record list.
    pub fn into_records(self) -> Result<Vec<Record>> {
        self.into_data().map(records_from_data)
    }

    /// Convert into a pipeline retrieval.
    pub fn into_retrieval(self) -> Retrieval {
        if self.is_success() {
            Retrieval::success(records_from_data(self.data))
        } else {
            let message = self
                .message
                .unwrap_or_else(|| format!("backend code {}", self.code));
            Retrieval::failure(message)
        }
    }
}

/// Normalise an envelope payload into records.
///
/// Arrays map item by item, `{records: [...]}` pages unwrap, other objects
/// become a single record, scalars are wrapped and `null` is empty.
pub fn records_from_data(data: Value) -> Vec<Record> {
    match data {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(Record::from_value).collect(),
        Value::Object(mut object) => match object.remove(RECORDS_KEY) {
            Some(Value::Array(items)) => items.into_iter().map(Record::from_value).collect(),
            Some(other) => {
                object.insert(RECORDS_KEY.to_string(), other);
                vec![Record::from_value(Value::Object(object))]
            }
            None => vec![Record::from_value(Value::Object(object))],
        },
        scalar => vec![Record::from_value(scalar)],
    }
}
