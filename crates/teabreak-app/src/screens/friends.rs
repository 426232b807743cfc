//! Friends page: four tabs, each its own list pipeline.
//!
//! Every tab row is enriched with the other party's profile under `user`, so
//! the search box matches usernames and emails on all tabs.

use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use teabreak_client::{descriptors, HttpBackend, UserById};
use teabreak_core::{
    Descriptor, MutationOutcome, RecordKey, RefreshScope, RequestStatus, Result, Session,
};
use teabreak_pipeline::{EnrichmentSpec, PageRequest, Pipeline, PipelineInputs, SearchQuery, ViewModel};

use super::{guard, ListPipeline};

/// Fields the search box matches against on every tab.
pub const SEARCH_FIELDS: [&str; 2] = ["user.username", "user.email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FriendsTab {
    Friends,
    Sent,
    Received,
    Following,
}

impl FriendsTab {
    pub const ALL: [FriendsTab; 4] = [
        FriendsTab::Friends,
        FriendsTab::Sent,
        FriendsTab::Received,
        FriendsTab::Following,
    ];

    pub fn descriptor(self) -> Descriptor {
        match self {
            FriendsTab::Friends => descriptors::friends(),
            FriendsTab::Sent => descriptors::sent_friend_requests(),
            FriendsTab::Received => descriptors::received_friend_requests(),
            FriendsTab::Following => descriptors::follows(),
        }
    }

    /// Field naming the other party of each row.
    pub fn key_field(self) -> &'static str {
        match self {
            FriendsTab::Friends | FriendsTab::Following => "id",
            FriendsTab::Sent => "toUserId",
            FriendsTab::Received => "fromUserId",
        }
    }

    /// Tabs whose rows a mutation with this scope invalidated.
    pub fn affected_by(scope: RefreshScope) -> &'static [FriendsTab] {
        match scope {
            RefreshScope::Friends => &[FriendsTab::Friends],
            RefreshScope::FriendRequests => &[FriendsTab::Sent, FriendsTab::Received],
            RefreshScope::Follows => &[FriendsTab::Following],
            _ => &[],
        }
    }
}

pub struct FriendsScreen {
    backend: Arc<HttpBackend>,
    friends: ListPipeline,
    sent: ListPipeline,
    received: ListPipeline,
    following: ListPipeline,
}

impl FriendsScreen {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self {
            friends: Pipeline::new(Arc::clone(&backend)),
            sent: Pipeline::new(Arc::clone(&backend)),
            received: Pipeline::new(Arc::clone(&backend)),
            following: Pipeline::new(Arc::clone(&backend)),
            backend,
        }
    }

    fn pipeline(&self, tab: FriendsTab) -> &ListPipeline {
        match tab {
            FriendsTab::Friends => &self.friends,
            FriendsTab::Sent => &self.sent,
            FriendsTab::Received => &self.received,
            FriendsTab::Following => &self.following,
        }
    }

    fn enrichment(&self, tab: FriendsTab) -> Vec<EnrichmentSpec> {
        vec![EnrichmentSpec::nest(
            tab.key_field(),
            "user",
            Arc::new(UserById::new(Arc::clone(&self.backend))),
        )]
    }

    pub async fn load(
        &self,
        session: &Session,
        tab: FriendsTab,
        search: &str,
        page: PageRequest,
    ) -> Result<ViewModel> {
        guard(session.require_user())?;
        let inputs = PipelineInputs {
            descriptors: vec![tab.descriptor()],
            enrichment: self.enrichment(tab),
            query: Some(SearchQuery::new(search, &SEARCH_FIELDS)),
            facets: Vec::new(),
            page,
        };
        let pipeline = self.pipeline(tab);
        let report = pipeline.rerun(inputs).await;
        Ok(pipeline.settle(report).await)
    }

    pub async fn search(&self, tab: FriendsTab, text: &str) -> ViewModel {
        self.pipeline(tab)
            .set_query(Some(SearchQuery::new(text, &SEARCH_FIELDS)))
            .await
    }

    pub async fn go_to_page(&self, tab: FriendsTab, number: usize) -> ViewModel {
        self.pipeline(tab).set_page(number).await
    }

    pub async fn view(&self, tab: FriendsTab) -> ViewModel {
        self.pipeline(tab).view().await
    }

    async fn refetch(&self, tab: FriendsTab) {
        debug!(descriptor = %tab.descriptor(), "Refreshing friends tab");
        self.pipeline(tab)
            .refetch(vec![tab.descriptor()], self.enrichment(tab))
            .await;
    }

    /// Re-run the tabs an outcome invalidated. Failed outcomes refresh nothing.
    async fn refresh(&self, outcome: &MutationOutcome) {
        if !outcome.ok {
            return;
        }
        for &tab in FriendsTab::affected_by(outcome.refresh) {
            self.refetch(tab).await;
        }
    }

    pub async fn add_friend_by_email(
        &self,
        session: &Session,
        email: &str,
        message: Option<&str>,
    ) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.add_friend_by_email(email, message).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    /// Accept or reject a received request. Accepting also refreshes the
    /// friends tab.
    pub async fn handle_request(
        &self,
        session: &Session,
        request_id: &RecordKey,
        status: RequestStatus,
    ) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.handle_friend_request(request_id, status).await;
        self.refresh(&outcome).await;
        if outcome.ok && status == RequestStatus::Accepted {
            self.refetch(FriendsTab::Friends).await;
        }
        Ok(outcome)
    }

    pub async fn delete_friend(&self, session: &Session, friend_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.delete_friend(friend_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn follow(&self, session: &Session, user_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.follow(user_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn unfollow(&self, session: &Session, user_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.unfollow(user_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }
}
