//! Generation-tagged orchestration of the list pipeline.
//!
//! Each call to [`Pipeline::rerun`] takes the next generation number before
//! any work starts. When a run finishes it only applies its result if no
//! newer run has started in the meantime; otherwise the result is discarded,
//! so a slow response can never overwrite a newer one.
//!
//! Search, facet and paging changes do not fetch. They re-derive the view
//! from the records held by the last applied run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use teabreak_core::{Descriptor, Record, Retriever};

use crate::enricher::{enrich_all, EnrichmentSpec};
use crate::error::FetchError;
use crate::fetcher::Fetcher;
use crate::filter::{apply_facets, filter, Facet, SearchQuery};
use crate::paginator::{paginate, PageRequest};
use crate::view_model::{assemble, PipelineStatus, ViewModel};

/// Everything one run needs.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub descriptors: Vec<Descriptor>,
    pub enrichment: Vec<EnrichmentSpec>,
    pub query: Option<SearchQuery>,
    pub facets: Vec<Facet>,
    pub page: PageRequest,
}

impl PipelineInputs {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self {
            descriptors,
            ..Self::default()
        }
    }

    pub fn with_enrichment(mut self, spec: EnrichmentSpec) -> Self {
        self.enrichment.push(spec);
        self
    }

    pub fn with_query(mut self, query: SearchQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// What happened to a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunReport {
    /// The run was still the latest and its view is now current.
    Applied { generation: u64, view: ViewModel },
    /// A newer run started first; nothing was applied.
    Discarded { generation: u64, latest: u64 },
}

impl RunReport {
    pub fn is_applied(&self) -> bool {
        matches!(self, RunReport::Applied { .. })
    }

    pub fn view(&self) -> Option<&ViewModel> {
        match self {
            RunReport::Applied { view, .. } => Some(view),
            RunReport::Discarded { .. } => None,
        }
    }

    pub fn into_view(self) -> Option<ViewModel> {
        match self {
            RunReport::Applied { view, .. } => Some(view),
            RunReport::Discarded { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct PipelineState {
    records: Vec<Record>,
    query: Option<SearchQuery>,
    facets: Vec<Facet>,
    page: PageRequest,
    status: PipelineStatus,
    error: Option<FetchError>,
    warning: Option<FetchError>,
}

impl PipelineState {
    /// Facets, then search, then clamp the page and slice.
    fn derive(&mut self) -> ViewModel {
        let faceted = apply_facets(&self.records, &self.facets);
        let filtered = filter(&faceted, self.query.as_ref());
        self.page = self.page.clamp_to(filtered.len());

        let page = paginate(&filtered, self.page.number, self.page.size);
        let loading = self.status == PipelineStatus::Loading;
        let error = self
            .error
            .as_ref()
            .filter(|_| !loading)
            .map(|e| e as &dyn std::error::Error);
        let mut view = assemble(page, loading, error)
            .with_warning(self.warning.as_ref().map(ToString::to_string));
        if self.status == PipelineStatus::Idle {
            view.status = PipelineStatus::Idle;
        }
        view
    }
}

/// One list's pipeline: fetch, enrich, filter, paginate, assemble.
pub struct Pipeline<R> {
    fetcher: Fetcher<R>,
    generation: AtomicU64,
    state: RwLock<PipelineState>,
}

impl<R: Retriever> Pipeline<R> {
    pub fn new(retriever: R) -> Self {
        Self {
            fetcher: Fetcher::new(retriever),
            generation: AtomicU64::new(0),
            state: RwLock::new(PipelineState::default()),
        }
    }

    pub fn retriever(&self) -> &R {
        self.fetcher.retriever()
    }

    /// Generation of the most recently started run.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    /// Start a new run and apply it unless a newer one starts meanwhile.
    pub async fn rerun(&self, inputs: PipelineInputs) -> RunReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let run_id = Uuid::now_v7();
        let span = info_span!(
            "pipeline_run",
            subsystem = "pipeline",
            op = "rerun",
            generation,
            run_id = %run_id,
        );
        self.run(generation, inputs).instrument(span).await
    }

    /// Re-fetch with the search, facets and page currently held, e.g. after a
    /// mutation invalidated this list.
    pub async fn refetch(
        &self,
        descriptors: Vec<Descriptor>,
        enrichment: Vec<EnrichmentSpec>,
    ) -> RunReport {
        let inputs = {
            let state = self.state.read().await;
            PipelineInputs {
                descriptors,
                enrichment,
                query: state.query.clone(),
                facets: state.facets.clone(),
                page: state.page,
            }
        };
        self.rerun(inputs).await
    }

    /// View of a finished run, or the current view when it was superseded.
    pub async fn settle(&self, report: RunReport) -> ViewModel {
        match report.into_view() {
            Some(view) => view,
            None => self.view().await,
        }
    }

    async fn run(&self, generation: u64, inputs: PipelineInputs) -> RunReport {
        let start = Instant::now();
        let PipelineInputs {
            descriptors,
            enrichment,
            query,
            facets,
            page,
        } = inputs;

        {
            let mut state = self.state.write().await;
            if self.is_latest(generation) {
                state.status = PipelineStatus::Loading;
                state.error = None;
                state.warning = None;
                state.query = query;
                state.facets = facets;
                state.page = page;
            }
        }

        let fetched = self.fetcher.fetch(&descriptors).await;

        if !self.is_latest(generation) {
            return self.discard(generation);
        }

        match fetched {
            Err(err) => {
                let mut state = self.state.write().await;
                if !self.is_latest(generation) {
                    return self.discard(generation);
                }
                error!(
                    error = %err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Pipeline run failed"
                );
                state.records = Vec::new();
                state.status = PipelineStatus::Failed;
                state.error = Some(err);
                state.warning = None;
                RunReport::Applied {
                    generation,
                    view: state.derive(),
                }
            }
            Ok(fetched) => {
                let records = enrich_all(fetched.records, &enrichment).await;

                let mut state = self.state.write().await;
                if !self.is_latest(generation) {
                    return self.discard(generation);
                }
                if let Some(warning) = &fetched.warning {
                    warn!(warning = %warning, "Pipeline run applied with partial data");
                }
                let failed = records.iter().filter(|r| r.enrichment_error()).count();
                state.records = records;
                state.status = PipelineStatus::Ready;
                state.error = None;
                state.warning = fetched.warning;
                let view = state.derive();
                info!(
                    record_count = state.records.len(),
                    failed_count = failed,
                    result_count = view.total_items,
                    query = state.query.as_ref().map_or("", |q| q.text.as_str()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Pipeline run applied"
                );
                RunReport::Applied { generation, view }
            }
        }
    }

    fn discard(&self, generation: u64) -> RunReport {
        let latest = self.latest_generation();
        debug!(generation, latest, "Discarding stale pipeline run");
        RunReport::Discarded { generation, latest }
    }

    /// Current view, derived from the last applied run.
    pub async fn view(&self) -> ViewModel {
        self.state.write().await.derive()
    }

    pub async fn status(&self) -> PipelineStatus {
        self.state.read().await.status
    }

    /// All records held by the last applied run, before search and paging.
    pub async fn records(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }

    /// Change the search. The page is kept and clamped to the new result.
    pub async fn set_query(&self, query: Option<SearchQuery>) -> ViewModel {
        let mut state = self.state.write().await;
        state.query = query;
        state.derive()
    }

    pub async fn set_facets(&self, facets: Vec<Facet>) -> ViewModel {
        let mut state = self.state.write().await;
        state.facets = facets;
        state.derive()
    }

    pub async fn set_page(&self, number: usize) -> ViewModel {
        let mut state = self.state.write().await;
        state.page.number = number;
        state.derive()
    }

    /// Change the page size and go back to the first page.
    pub async fn set_page_size(&self, size: usize) -> ViewModel {
        let mut state = self.state.write().await;
        state.page = PageRequest::new(1, size);
        state.derive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use teabreak_core::Retrieval;

    struct Fixed(Vec<Record>);

    #[async_trait]
    impl Retriever for Fixed {
        async fn retrieve(&self, descriptor: &Descriptor) -> Retrieval {
            if descriptor.name == "broken" {
                Retrieval::failure("HTTP 500")
            } else {
                Retrieval::success(self.0.clone())
            }
        }
    }

    fn pipeline(count: usize) -> Pipeline<Fixed> {
        let records = (1..=count)
            .map(|i| Record::from_value(json!({"id": i, "title": format!("Paper {}", i)})))
            .collect();
        Pipeline::new(Fixed(records))
    }

    fn inputs(name: &str) -> PipelineInputs {
        PipelineInputs::new(vec![Descriptor::get(name, "/Papers/GetAllPapers")])
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let pipeline = pipeline(3);
        assert_eq!(pipeline.status().await, PipelineStatus::Idle);
        assert_eq!(pipeline.view().await.status, PipelineStatus::Idle);
        assert_eq!(pipeline.latest_generation(), 0);
    }

    #[tokio::test]
    async fn test_rerun_applies() {
        let pipeline = pipeline(25);
        let report = pipeline.rerun(inputs("papers")).await;

        let view = report.view().unwrap();
        assert_eq!(view.status, PipelineStatus::Ready);
        assert_eq!(view.total_items, 25);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.items.len(), 10);
        assert_eq!(pipeline.latest_generation(), 1);
    }

    #[tokio::test]
    async fn test_rerun_total_failure() {
        let pipeline = pipeline(5);
        let view = pipeline.rerun(inputs("broken")).await.into_view().unwrap();

        assert_eq!(view.status, PipelineStatus::Failed);
        assert!(view.items.is_empty());
        assert_eq!(view.error_message.as_deref(), Some("Failed to load: broken (HTTP 500)"));
    }

    #[tokio::test]
    async fn test_rerun_partial_failure_warns() {
        let pipeline = pipeline(2);
        let inputs = PipelineInputs::new(vec![
            Descriptor::get("papers", "/a"),
            Descriptor::get("broken", "/b"),
        ]);
        let view = pipeline.rerun(inputs).await.into_view().unwrap();

        assert_eq!(view.status, PipelineStatus::Ready);
        assert_eq!(view.total_items, 2);
        assert!(view.warning.unwrap().contains("broken"));
    }

    #[tokio::test]
    async fn test_set_page_size_resets_page() {
        let pipeline = pipeline(45);
        pipeline.rerun(inputs("papers")).await;

        assert_eq!(pipeline.set_page(4).await.page_number, 4);
        let view = pipeline.set_page_size(20).await;
        assert_eq!(view.page_number, 1);
        assert_eq!(view.total_pages, 3);
    }

    #[tokio::test]
    async fn test_query_change_keeps_clamped_page() {
        let pipeline = pipeline(45);
        pipeline.rerun(inputs("papers")).await;
        pipeline.set_page(5).await;

        // "Paper 1" matches 1 and 10..=19: 11 records, 2 pages.
        let view = pipeline
            .set_query(Some(SearchQuery::new("paper 1", &["title"])))
            .await;
        assert_eq!(view.total_items, 11);
        assert_eq!(view.page_number, 2);
        assert_eq!(view.status, PipelineStatus::Ready);
        // No fetch happened.
        assert_eq!(pipeline.latest_generation(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_clamped() {
        let pipeline = pipeline(12);
        let view = pipeline
            .rerun(inputs("papers").with_page(PageRequest::new(9, 10)))
            .await
            .into_view()
            .unwrap();
        assert_eq!(view.page_number, 2);
        assert_eq!(view.items.len(), 2);
    }

    #[tokio::test]
    async fn test_refetch_keeps_search_and_page() {
        let pipeline = pipeline(45);
        pipeline
            .rerun(
                inputs("papers")
                    .with_query(SearchQuery::new("paper", &["title"]))
                    .with_page(PageRequest::new(3, 10)),
            )
            .await;

        let report = pipeline
            .refetch(vec![Descriptor::get("papers", "/Papers/GetAllPapers")], Vec::new())
            .await;
        let view = pipeline.settle(report).await;
        assert_eq!(view.page_number, 3);
        assert_eq!(pipeline.latest_generation(), 2);
    }

    #[tokio::test]
    async fn test_facets_restrict_before_paging() {
        let pipeline = pipeline(30);
        pipeline.rerun(inputs("papers")).await;
        let view = pipeline.set_facets(vec![Facet::equals("id", "7")]).await;
        assert_eq!(view.total_items, 1);
        assert_eq!(pipeline.records().await.len(), 30);
    }
}
