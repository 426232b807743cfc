//! Pipeline error types.

use serde::Serialize;
use thiserror::Error;

/// One retrieval descriptor that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDescriptor {
    pub descriptor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fetch failure across one or more descriptors.
///
/// `partial` is true when at least one descriptor still succeeded; the
/// fetched records are then usable and this error is only a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", self.describe())]
pub struct FetchError {
    pub partial: bool,
    pub failed: Vec<FailedDescriptor>,
}

impl FetchError {
    pub fn partial(failed: Vec<FailedDescriptor>) -> Self {
        Self {
            partial: true,
            failed,
        }
    }

    pub fn total(failed: Vec<FailedDescriptor>) -> Self {
        Self {
            partial: false,
            failed,
        }
    }

    /// Names of the failed descriptors, in declaration order.
    pub fn failed_descriptors(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.descriptor.as_str()).collect()
    }

    fn describe(&self) -> String {
        let detail = self
            .failed
            .iter()
            .map(|f| match &f.message {
                Some(message) => format!("{} ({})", f.descriptor, message),
                None => f.descriptor.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        if self.partial {
            format!("Partial data, failed to load: {}", detail)
        } else {
            format!("Failed to load: {}", detail)
        }
    }
}
