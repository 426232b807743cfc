//! Explicit results of mutation calls.
//!
//! A mutation never refreshes a list on its own. It returns a
//! [`MutationOutcome`] naming the list it invalidated, and the orchestrating
//! screen decides whether to re-run that list's pipeline.

use serde::Serialize;

use crate::record::RecordKey;

/// Which list a mutation invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
    Nothing,
    Papers,
    Comments,
    Friends,
    FriendRequests,
    Follows,
    Users,
    ReporterApplications,
    Profile,
    Session,
}

/// Result of a mutation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub refresh: RefreshScope,
    /// Id the backend assigned to a created entity (comment, reply).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<RecordKey>,
}

impl MutationOutcome {
    pub fn succeeded(refresh: RefreshScope, message: Option<String>) -> Self {
        Self {
            ok: true,
            message,
            refresh,
            created: None,
        }
    }

    /// A failed mutation invalidates nothing.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            refresh: RefreshScope::Nothing,
            created: None,
        }
    }

    pub fn with_created(mut self, created: Option<RecordKey>) -> Self {
        self.created = created;
        self
    }

    /// Whether the given list should be re-fetched.
    pub fn invalidates(&self, scope: RefreshScope) -> bool {
        self.ok && self.refresh == scope
    }
}
