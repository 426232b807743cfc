//! Profile page: the signed-in user and the papers they uploaded.

use std::sync::Arc;

use serde::Serialize;

use teabreak_client::{descriptors, HttpBackend, PaperCounter};
use teabreak_core::{Error, MutationOutcome, Result, Session, UserProfile};
use teabreak_pipeline::{EnrichmentSpec, PageRequest, Pipeline, PipelineInputs, ViewModel};

use super::{guard, ListPipeline};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: UserProfile,
    pub papers: ViewModel,
}

pub struct ProfileScreen {
    backend: Arc<HttpBackend>,
    papers: ListPipeline,
}

impl ProfileScreen {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self {
            papers: Pipeline::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Each uploaded paper shows its view and download counters.
    fn enrichment(&self) -> Vec<EnrichmentSpec> {
        vec![
            EnrichmentSpec::nest(
                "id",
                "views",
                Arc::new(PaperCounter::views(Arc::clone(&self.backend))),
            ),
            EnrichmentSpec::nest(
                "id",
                "downloads",
                Arc::new(PaperCounter::downloads(Arc::clone(&self.backend))),
            ),
        ]
    }

    pub async fn load(&self, session: &Session, page: PageRequest) -> Result<ProfileView> {
        guard(session.require_user())?;
        // The profile always reflects the backend's view of the session.
        let current = self.backend.current_session().await?;
        let user = current
            .user()
            .cloned()
            .ok_or_else(|| Error::Unauthorized("session expired".to_string()))?;
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| Error::InvalidInput("profile has no id".to_string()))?;

        let inputs = PipelineInputs {
            descriptors: vec![descriptors::user_papers(&user_id)],
            enrichment: self.enrichment(),
            query: None,
            facets: Vec::new(),
            page,
        };
        let report = self.papers.rerun(inputs).await;
        let papers = self.papers.settle(report).await;
        Ok(ProfileView { user, papers })
    }

    pub async fn go_to_page(&self, number: usize) -> ViewModel {
        self.papers.set_page(number).await
    }

    /// Apply to become a reporter. A successful application changes the
    /// profile, so the caller should reload it.
    pub async fn apply_as_reporter(
        &self,
        session: &Session,
        note: &str,
        with_attachment: bool,
    ) -> Result<MutationOutcome> {
        guard(session.require_user())?;
        let outcome = self.backend.apply_as_reporter(note, with_attachment).await;
        Ok(outcome)
    }
}
