//! Author picker: debounced lookup of users by email and the selected set.
//!
//! Each lookup takes the next generation number before waiting out the
//! debounce. A lookup whose generation is no longer the latest when it wakes
//! up, or when its answer arrives, reports [`EmailLookup::Superseded`] and
//! never replaces a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use teabreak_client::HttpBackend;
use teabreak_core::defaults::EMAIL_SEARCH_DEBOUNCE_MS;
use teabreak_core::{RecordKey, Result, UserProfile};

/// Finds users by exact email address.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;
}

#[async_trait]
impl UserDirectory for HttpBackend {
    async fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        HttpBackend::user_by_email(self, email).await
    }
}

#[async_trait]
impl<T: UserDirectory + ?Sized> UserDirectory for Arc<T> {
    async fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        (**self).user_by_email(email).await
    }
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Result of one email lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum EmailLookup {
    /// Text is not an email address yet; nothing was sent.
    Skipped,
    /// A newer lookup started; this one's answer is dropped.
    Superseded,
    Found(UserProfile),
    NotFound,
    Failed(String),
}

/// Debounced, generation-guarded email search.
pub struct EmailSearch<D> {
    directory: D,
    debounce: Duration,
    generation: AtomicU64,
}

impl<D: UserDirectory> EmailSearch<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            debounce: Duration::from_millis(EMAIL_SEARCH_DEBOUNCE_MS),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Look up the user for `text` after the debounce delay.
    ///
    /// Only text containing `@` (after trimming) is looked up.
    pub async fn search(&self, text: &str) -> EmailLookup {
        let email = text.trim();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !email.contains('@') {
            trace!(generation, "Email search skipped");
            return EmailLookup::Skipped;
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(generation) {
            debug!(generation, "Email search superseded during debounce");
            return EmailLookup::Superseded;
        }

        let result = self.directory.user_by_email(email).await;
        if !self.is_latest(generation) {
            debug!(generation, "Email search superseded in flight");
            return EmailLookup::Superseded;
        }

        match result {
            Ok(Some(user)) => EmailLookup::Found(user),
            Ok(None) => EmailLookup::NotFound,
            Err(e) => EmailLookup::Failed(e.to_string()),
        }
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Authors picked for a paper, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorSelection {
    authors: Vec<UserProfile>,
}

impl AuthorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Returns false when the user has no id or is already picked.
    pub fn add(&mut self, user: UserProfile) -> bool {
        let Some(id) = &user.id else {
            return false;
        };
        if self.contains(id) {
            return false;
        }
        self.authors.push(user);
        true
    }

    pub fn remove(&mut self, id: &RecordKey) -> bool {
        let before = self.authors.len();
        self.authors.retain(|a| a.id.as_ref() != Some(id));
        self.authors.len() != before
    }

    pub fn contains(&self, id: &RecordKey) -> bool {
        self.authors.iter().any(|a| a.id.as_ref() == Some(id))
    }

    pub fn authors(&self) -> &[UserProfile] {
        &self.authors
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Ids joined as the backend expects them, e.g. `"3, 8"`.
    pub fn joined_ids(&self) -> String {
        self.authors
            .iter()
            .filter_map(|a| a.id.as_ref().map(RecordKey::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
