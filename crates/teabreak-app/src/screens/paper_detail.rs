//! Paper detail: the paper, its counters and its comment thread.
//!
//! Comment mutations refresh the thread from the backend. When that refresh
//! fails but the backend reported the new comment's id, the comment is
//! inserted into the held thread instead.

use std::sync::Arc;

use futures::future::join;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use teabreak_client::{descriptors, HttpBackend, PaperCounter, UserById};
use teabreak_core::{
    count_comments, insert_reply, remove_comment, Comment, Error, MutationOutcome, Paper,
    PaperStats, RecordKey, RefreshScope, Resolver, Result, Session,
};
use teabreak_pipeline::{enrich, EnrichmentSpec, Fetcher, YearFromTimestamp};

use crate::author_picker::AuthorSelection;

use super::guard;

/// Everything the detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperDetail {
    pub paper: Paper,
    pub stats: PaperStats,
    pub comments: Vec<Comment>,
}

pub struct PaperDetailScreen {
    backend: Arc<HttpBackend>,
    paper_id: RecordKey,
    comments: RwLock<Vec<Comment>>,
}

impl PaperDetailScreen {
    pub fn new(backend: Arc<HttpBackend>, paper_id: RecordKey) -> Self {
        Self {
            backend,
            paper_id,
            comments: RwLock::new(Vec::new()),
        }
    }

    pub fn paper_id(&self) -> &RecordKey {
        &self.paper_id
    }

    /// Load the paper, its counters and comments, and count the visit.
    pub async fn load(&self, session: &Session) -> Result<PaperDetail> {
        guard(session.require_user())?;

        let paper = self.load_paper().await?;
        let comments = self.load_comments().await?;
        let (views, downloads) = join(
            counter(PaperCounter::views(Arc::clone(&self.backend)), &self.paper_id),
            counter(PaperCounter::downloads(Arc::clone(&self.backend)), &self.paper_id),
        )
        .await;

        let visit = self.backend.record_view(&self.paper_id).await;
        if !visit.ok {
            warn!(
                subsystem = "app",
                record_key = %self.paper_id,
                error = visit.message.as_deref().unwrap_or(""),
                "View was not counted"
            );
        }

        let stats = PaperStats {
            id: Some(self.paper_id.clone()),
            views,
            downloads,
            comments: count_comments(&comments) as u64,
        };
        *self.comments.write().await = comments.clone();
        Ok(PaperDetail {
            paper,
            stats,
            comments,
        })
    }

    async fn load_paper(&self) -> Result<Paper> {
        let record = self.backend.paper(&self.paper_id).await?;
        let year = EnrichmentSpec::nest("createTime", "year", Arc::new(YearFromTimestamp));
        let enriched = enrich(vec![record], &year).await;
        match enriched.first() {
            // An unparsable timestamp leaves the year null, which decodes as None.
            Some(record) => record.decode(),
            None => Err(Error::NotFound(format!("paper {}", self.paper_id))),
        }
    }

    async fn load_comments(&self) -> Result<Vec<Comment>> {
        let fetcher = Fetcher::new(Arc::clone(&self.backend));
        let fetched = fetcher
            .fetch(&[descriptors::comments(&self.paper_id)])
            .await
            .map_err(|e| Error::Request(e.to_string()))?;
        let authors = EnrichmentSpec::nest(
            "userId",
            "user",
            Arc::new(UserById::new(Arc::clone(&self.backend))),
        );
        enrich(fetched.records, &authors)
            .await
            .iter()
            .map(Comment::from_record)
            .collect()
    }

    /// Comments currently held, as last loaded or updated.
    pub async fn comments(&self) -> Vec<Comment> {
        self.comments.read().await.clone()
    }

    pub async fn add_comment(&self, session: &Session, content: &str) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.add_comment(&self.paper_id, content).await;
        self.after_post(session, &outcome, None, content).await;
        Ok(outcome)
    }

    pub async fn reply(
        &self,
        session: &Session,
        parent_id: &RecordKey,
        content: &str,
    ) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self
            .backend
            .add_reply(&self.paper_id, parent_id, content)
            .await;
        self.after_post(session, &outcome, Some(parent_id), content).await;
        Ok(outcome)
    }

    async fn after_post(
        &self,
        session: &Session,
        outcome: &MutationOutcome,
        parent_id: Option<&RecordKey>,
        content: &str,
    ) {
        if !outcome.invalidates(RefreshScope::Comments) || self.refresh_comments().await {
            return;
        }
        let Some(id) = &outcome.created else {
            return;
        };
        let mut comment = Comment::new(id.clone(), content);
        if let Some(user) = session.user() {
            comment.user_id = user.id.clone();
            comment.user = Some(user.clone());
        }

        let mut comments = self.comments.write().await;
        match parent_id {
            None => comments.push(comment),
            Some(parent) => match insert_reply(&comments, parent, comment) {
                Some(updated) => *comments = updated,
                None => warn!(record_key = %parent, "Reply parent is no longer in the thread"),
            },
        }
    }

    pub async fn delete_comment(&self, session: &Session, comment_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.delete_comment(comment_id).await;
        if outcome.invalidates(RefreshScope::Comments) && !self.refresh_comments().await {
            let mut comments = self.comments.write().await;
            *comments = remove_comment(&comments, comment_id);
        }
        Ok(outcome)
    }

    /// Reload the thread. Returns false, keeping the held thread, on failure.
    async fn refresh_comments(&self) -> bool {
        match self.load_comments().await {
            Ok(comments) => {
                debug!(record_key = %self.paper_id, "Comment thread refreshed");
                *self.comments.write().await = comments;
                true
            }
            Err(e) => {
                warn!(record_key = %self.paper_id, error = %e, "Comment refresh failed");
                false
            }
        }
    }

    /// Relate the picked users to this paper as authors.
    pub async fn relate_authors(
        &self,
        session: &Session,
        selection: &AuthorSelection,
    ) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        Ok(self
            .backend
            .relate_authors(&self.paper_id, &selection.joined_ids())
            .await)
    }

    pub async fn record_download(&self, session: &Session) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        Ok(self.backend.record_download(&self.paper_id).await)
    }
}

/// Read a counter, treating failures and non-numeric values as zero.
async fn counter(resolver: PaperCounter, paper_id: &RecordKey) -> u64 {
    match resolver.resolve(paper_id).await {
        Ok(value) => as_count(&value),
        Err(e) => {
            warn!(component = resolver.name(), record_key = %paper_id, error = %e, "Counter unavailable");
            0
        }
    }
}

fn as_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
