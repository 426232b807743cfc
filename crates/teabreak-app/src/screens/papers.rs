//! Paper list: search, conference/year facets, paging and admin deletion.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use teabreak_client::{descriptors, HttpBackend, PaperAuthors};
use teabreak_core::{MutationOutcome, RecordKey, RefreshScope, Result, Session};
use teabreak_pipeline::{
    facet_values, EnrichmentSpec, Facet, PageRequest, Pipeline, PipelineInputs, SearchQuery,
    ViewModel, YearFromTimestamp,
};

use super::{guard, ListPipeline};

/// Fields the search box matches against.
pub const SEARCH_FIELDS: [&str; 3] = ["title", "conference", "authors.username"];

/// Search text and facet selections of the paper list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaperFilters {
    pub text: String,
    /// Conference substring, or `"all"`/empty for any.
    pub conference: String,
    /// Exact year, or `"all"`/empty for any.
    pub year: String,
}

impl PaperFilters {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_conference(mut self, conference: impl Into<String>) -> Self {
        self.conference = conference.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.text.clone(), &SEARCH_FIELDS)
    }

    pub fn facets(&self) -> Vec<Facet> {
        vec![
            Facet::contains("conference", self.conference.clone()),
            Facet::equals("year", self.year.clone()),
        ]
    }
}

/// Values offered by the facet dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub conferences: Vec<String>,
    pub years: Vec<String>,
}

pub struct PapersScreen {
    backend: Arc<HttpBackend>,
    pipeline: ListPipeline,
}

impl PapersScreen {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self {
            pipeline: Pipeline::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Authors and publication year are missing from the list payload.
    fn enrichment(&self) -> Vec<EnrichmentSpec> {
        vec![
            EnrichmentSpec::nest(
                "id",
                "authors",
                Arc::new(PaperAuthors::new(Arc::clone(&self.backend))),
            ),
            EnrichmentSpec::nest("createTime", "year", Arc::new(YearFromTimestamp)),
        ]
    }

    pub async fn load(
        &self,
        session: &Session,
        filters: &PaperFilters,
        page: PageRequest,
    ) -> Result<ViewModel> {
        guard(session.require_user())?;
        let inputs = PipelineInputs {
            descriptors: vec![descriptors::all_papers()],
            enrichment: self.enrichment(),
            query: Some(filters.query()),
            facets: filters.facets(),
            page,
        };
        let report = self.pipeline.rerun(inputs).await;
        Ok(self.pipeline.settle(report).await)
    }

    /// Apply new search text and facets without fetching.
    pub async fn apply_filters(&self, filters: &PaperFilters) -> ViewModel {
        self.pipeline.set_query(Some(filters.query())).await;
        self.pipeline.set_facets(filters.facets()).await
    }

    pub async fn go_to_page(&self, number: usize) -> ViewModel {
        self.pipeline.set_page(number).await
    }

    pub async fn set_page_size(&self, size: usize) -> ViewModel {
        self.pipeline.set_page_size(size).await
    }

    pub async fn filter_options(&self) -> FilterOptions {
        let records = self.pipeline.records().await;
        FilterOptions {
            conferences: facet_values(&records, "conference"),
            years: facet_values(&records, "year"),
        }
    }

    /// Delete a paper (administrators only) and refresh the list on success.
    pub async fn delete_paper(&self, session: &Session, paper_id: &RecordKey) -> Result<MutationOutcome> {
        guard(session.require_admin())?;
        let outcome = self.backend.delete_paper(paper_id).await;
        if outcome.invalidates(RefreshScope::Papers) {
            debug!(record_key = %paper_id, "Refreshing papers after deletion");
            self.pipeline
                .refetch(vec![descriptors::all_papers()], self.enrichment())
                .await;
        }
        Ok(outcome)
    }

    pub async fn view(&self) -> ViewModel {
        self.pipeline.view().await
    }
}
