//! # teabreak-client
//!
//! HTTP client for the TeaBreak backend.
//!
//! This crate provides:
//! - [`HttpBackend`]: cookie-session `reqwest` client implementing
//!   [`Retriever`](teabreak_core::Retriever) for the list pipeline
//! - Envelope decoding (`{code, data, message}`) into records
//! - Backend [`Resolver`](teabreak_core::Resolver)s for user profiles, paper
//!   authors and paper statistics
//! - Descriptors for every list screen and mutations returning
//!   [`MutationOutcome`](teabreak_core::MutationOutcome)
//!
//! ## Example
//!
//! ```ignore
//! use teabreak_client::{descriptors, ClientConfig, HttpBackend};
//!
//! let backend = HttpBackend::new(ClientConfig::from_env()?)?;
//! backend.sign_in("reader@tea.break", "secret").await;
//! let papers = backend.retrieve(&descriptors::all_papers()).await;
//! ```

pub mod api;
pub mod config;
pub mod descriptors;
pub mod envelope;
pub mod http;
pub mod resolvers;

pub use api::{format_ban_until, BAN_UNTIL_FORMAT};
pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use envelope::{records_from_data, Envelope};
pub use http::HttpBackend;
pub use resolvers::{Counter, PaperAuthors, PaperCounter, UserById};
