//! # teabreak-core
//!
//! Core types, traits, and abstractions for the TeaBreak client.
//!
//! This crate provides the record model every list screen shares, the typed
//! domain models, and the trait seams the pipeline and the HTTP client meet at.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod outcome;
pub mod record;
pub mod session;
pub mod thread;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use outcome::{MutationOutcome, RefreshScope};
pub use record::{Record, RecordKey};
pub use session::{Access, Session};
pub use thread::{count_comments, insert_reply, remove_comment, Comment};
pub use traits::*;
