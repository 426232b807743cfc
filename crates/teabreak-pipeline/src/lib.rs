//! # teabreak-pipeline
//!
//! Client-side list aggregation and pagination for TeaBreak screens.
//!
//! Every list screen (papers, friends, users, applications, comments) runs
//! the same stages:
//! - **Fetcher**: issues retrieval descriptors concurrently and merges them
//! - **Enricher**: fills in missing fields with per-record secondary lookups
//! - **Filter**: case-insensitive search plus AND-combined facets
//! - **Paginator**: slices pages and computes the navigation window
//! - **ViewModel**: the render-ready combination of page, loading and error
//!
//! [`Pipeline`] ties the stages together and tags every run with a
//! generation so stale results are dropped.
//!
//! ## Example
//!
//! ```ignore
//! use teabreak_pipeline::{Pipeline, PipelineInputs, SearchQuery, Descriptor};
//!
//! let pipeline = Pipeline::new(backend);
//! let report = pipeline
//!     .rerun(
//!         PipelineInputs::new(vec![Descriptor::get("papers", "/Papers/GetAllPapers")])
//!             .with_query(SearchQuery::new("deep", &["title", "authors.username"])),
//!     )
//!     .await;
//! ```

pub mod enricher;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod paginator;
pub mod pipeline;
pub mod resolvers;
pub mod view_model;

// Re-export core types
pub use teabreak_core::*;

pub use enricher::{enrich, enrich_all, EnrichmentSpec};
pub use error::{FailedDescriptor, FetchError};
pub use fetcher::{Fetched, Fetcher};
pub use filter::{apply_facets, facet_values, filter, Facet, FacetMode, SearchQuery};
pub use paginator::{
    page_window, page_window_with, paginate, total_pages, Page, PageRequest, PageWindow,
};
pub use pipeline::{Pipeline, PipelineInputs, RunReport};
pub use resolvers::YearFromTimestamp;
pub use view_model::{assemble, PipelineStatus, ViewModel};
