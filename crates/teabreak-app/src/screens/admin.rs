//! Administration: papers, users and reporter applications.
//!
//! Every operation here requires the administrator role.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info};

use teabreak_client::{descriptors, HttpBackend, UserById};
use teabreak_core::{Descriptor, MutationOutcome, RecordKey, RefreshScope, Result, Session};
use teabreak_pipeline::{EnrichmentSpec, PageRequest, Pipeline, PipelineInputs, SearchQuery, ViewModel};

use super::{guard, ListPipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AdminTab {
    Papers,
    Users,
    Applications,
}

impl AdminTab {
    pub fn descriptor(self) -> Descriptor {
        match self {
            AdminTab::Papers => descriptors::all_papers(),
            AdminTab::Users => descriptors::all_users(),
            AdminTab::Applications => descriptors::reporter_applications(),
        }
    }

    pub fn search_fields(self) -> &'static [&'static str] {
        match self {
            AdminTab::Papers => &["title", "conference"],
            AdminTab::Users => &["username", "email"],
            AdminTab::Applications => &["username", "email", "applyNote"],
        }
    }

    /// Tab listing what a mutation with this scope changed.
    pub fn affected_by(scope: RefreshScope) -> Option<AdminTab> {
        match scope {
            RefreshScope::Papers => Some(AdminTab::Papers),
            RefreshScope::Users => Some(AdminTab::Users),
            RefreshScope::ReporterApplications => Some(AdminTab::Applications),
            _ => None,
        }
    }
}

pub struct AdminScreen {
    backend: Arc<HttpBackend>,
    papers: ListPipeline,
    users: ListPipeline,
    applications: ListPipeline,
}

impl AdminScreen {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self {
            papers: Pipeline::new(Arc::clone(&backend)),
            users: Pipeline::new(Arc::clone(&backend)),
            applications: Pipeline::new(Arc::clone(&backend)),
            backend,
        }
    }

    fn pipeline(&self, tab: AdminTab) -> &ListPipeline {
        match tab {
            AdminTab::Papers => &self.papers,
            AdminTab::Users => &self.users,
            AdminTab::Applications => &self.applications,
        }
    }

    /// Applications only carry `userId`; the applicant's name and email are
    /// copied from their profile.
    fn enrichment(&self, tab: AdminTab) -> Vec<EnrichmentSpec> {
        match tab {
            AdminTab::Applications => vec![EnrichmentSpec::project(
                "userId",
                &["username", "email"],
                Arc::new(UserById::new(Arc::clone(&self.backend))),
            )],
            AdminTab::Papers | AdminTab::Users => Vec::new(),
        }
    }

    fn query(tab: AdminTab, text: &str) -> SearchQuery {
        SearchQuery::new(text, tab.search_fields())
    }

    pub async fn load(
        &self,
        session: &Session,
        tab: AdminTab,
        search: &str,
        page: PageRequest,
    ) -> Result<ViewModel> {
        guard(session.require_admin())?;
        let inputs = PipelineInputs {
            descriptors: vec![tab.descriptor()],
            enrichment: self.enrichment(tab),
            query: Some(Self::query(tab, search)),
            facets: Vec::new(),
            page,
        };
        let pipeline = self.pipeline(tab);
        let report = pipeline.rerun(inputs).await;
        Ok(pipeline.settle(report).await)
    }

    pub async fn search(&self, session: &Session, tab: AdminTab, text: &str) -> Result<ViewModel> {
        guard(session.require_admin())?;
        Ok(self.pipeline(tab).set_query(Some(Self::query(tab, text))).await)
    }

    pub async fn go_to_page(&self, session: &Session, tab: AdminTab, number: usize) -> Result<ViewModel> {
        guard(session.require_admin())?;
        Ok(self.pipeline(tab).set_page(number).await)
    }

    async fn refresh(&self, outcome: &MutationOutcome) {
        if !outcome.ok {
            return;
        }
        if let Some(tab) = AdminTab::affected_by(outcome.refresh) {
            debug!(descriptor = %tab.descriptor(), "Refreshing admin tab");
            self.pipeline(tab)
                .refetch(vec![tab.descriptor()], self.enrichment(tab))
                .await;
        }
    }

    pub async fn delete_paper(&self, session: &Session, paper_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        let outcome = self.backend.delete_paper(paper_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn mute_user(
        &self,
        session: &Session,
        user_id: &RecordKey,
        until: DateTime<Utc>,
    ) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        info!(subsystem = "app", record_key = %user_id, muted_until = %until, "Muting user");
        let outcome = self.backend.mute_user(user_id, until).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn unmute_user(&self, session: &Session, user_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        let outcome = self.backend.unmute_user(user_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn delete_user(&self, session: &Session, user_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        let outcome = self.backend.delete_user(user_id).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }

    pub async fn review_reporter(
        &self,
        session: &Session,
        application_id: &RecordKey,
        approve: bool,
    ) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        let outcome = self.backend.review_reporter(application_id, approve).await;
        self.refresh(&outcome).await;
        Ok(outcome)
    }
}
