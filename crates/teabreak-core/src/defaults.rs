//! Centralized default constants for the TeaBreak client.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// BACKEND
// =============================================================================

/// Default backend base URL. The web front end proxies `/api/*` here.
pub const API_URL: &str = "http://localhost:8080";

/// Timeout for a single backend request in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Envelope `code` the backend uses for success.
pub const SUCCESS_CODE: i64 = 200;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list screens.
pub const PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Number of consecutive page numbers shown in navigation controls.
pub const PAGE_WINDOW: usize = 5;

// =============================================================================
// SEARCH
// =============================================================================

/// Facet value meaning "no restriction".
pub const FACET_ALL: &str = "all";

/// Delay before an email lookup fires, in milliseconds.
pub const EMAIL_SEARCH_DEBOUNCE_MS: u64 = 500;

// =============================================================================
// ROLES
// =============================================================================

/// Role value of administrators.
pub const ADMIN_ROLE: i64 = 2;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Backend base URL override.
pub const ENV_API_URL: &str = "TEABREAK_API_URL";

/// Request timeout override (seconds).
pub const ENV_TIMEOUT_SECS: &str = "TEABREAK_TIMEOUT_SECS";

/// Sign-in email used by the CLI.
pub const ENV_EMAIL: &str = "TEABREAK_EMAIL";

/// Sign-in password used by the CLI.
pub const ENV_PASSWORD: &str = "TEABREAK_PASSWORD";
