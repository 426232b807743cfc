//! Structured logging field name constants.
//!
//! All crates use these names for structured `tracing` fields so log output
//! can be queried consistently across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Pipeline failed wholesale |
//! | WARN  | Partial fetch failure, per-record enrichment failure |
//! | INFO  | CLI lifecycle, sign-in, completed mutations |
//! | DEBUG | Stage completions, discarded stale runs |
//! | TRACE | Per-record and per-lookup work |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "pipeline", "client", "app"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "fetcher", "enricher", "paginator", "http"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "fetch", "enrich", "rerun", "retrieve"
pub const OPERATION: &str = "op";

/// Pipeline generation (monotonic run tag).
pub const GENERATION: &str = "generation";

/// Newest generation when a stale run is discarded.
pub const LATEST_GENERATION: &str = "latest";

/// Correlation ID of one pipeline run (UUIDv7).
pub const RUN_ID: &str = "run_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Retrieval descriptor name.
pub const DESCRIPTOR: &str = "descriptor";

/// Record key being operated on.
pub const RECORD_KEY: &str = "record_key";

/// Field a lookup fills in.
pub const TARGET_FIELD: &str = "target_field";

/// Search query text.
pub const QUERY: &str = "query";

/// Email address a user signed in or was looked up with.
pub const EMAIL: &str = "email";

/// Time a muted user may post again.
pub const MUTED_UNTIL: &str = "muted_until";

// ─── Transport fields ──────────────────────────────────────────────────────

/// Backend base URL.
pub const BASE_URL: &str = "base_url";

/// Request timeout in seconds.
pub const TIMEOUT_SECS: &str = "timeout_secs";

/// HTTP verb of a backend request.
pub const METHOD: &str = "method";

/// Path of a backend request.
pub const PATH: &str = "path";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records produced by a stage.
pub const RECORD_COUNT: &str = "record_count";

/// Number of failed descriptors or lookups.
pub const FAILED_COUNT: &str = "failed_count";

/// Number of distinct lookup keys issued.
pub const LOOKUP_COUNT: &str = "lookup_count";

/// Number of records left after facets and search.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Non-fatal problem a run was applied with.
pub const WARNING_MSG: &str = "warning";

/// Why a mutation was refused before it was sent.
pub const REASON: &str = "reason";

/// Envelope code returned by the backend.
pub const STATUS_CODE: &str = "code";

/// Output format chosen for the subscriber ("json" or "text").
pub const LOG_FORMAT: &str = "log_format";
