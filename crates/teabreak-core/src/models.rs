//! Typed domain models for TeaBreak backend entities.
//!
//! The pipeline moves [`Record`](crate::Record)s around; these structs are the
//! typed view used when a screen or a mutation needs specific fields.
//! Field names follow the backend's camelCase JSON.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::defaults::ADMIN_ROLE;
use crate::record::RecordKey;

// =============================================================================
// USERS
// =============================================================================

/// A user profile as returned by `/Users/GetInfo*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<i64>,
    /// Muted until this backend timestamp, if muted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Some(ADMIN_ROLE)
    }

    /// Username, falling back to the email address.
    pub fn display_name(&self) -> Option<&str> {
        self.username.as_deref().or(self.email.as_deref())
    }
}

// =============================================================================
// PAPERS
// =============================================================================

/// A paper as listed by `/Papers/GetAllPapers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default)]
    pub title: String,
    /// Comma-separated author ids as stored by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_tag: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}

impl Paper {
    /// Publication year, preferring the explicit field over `createTime`.
    pub fn effective_year(&self) -> Option<i32> {
        self.year
            .or_else(|| self.create_time.as_deref().and_then(parse_year))
    }
}

/// View/download/comment counters for one paper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments: u64,
}

// =============================================================================
// SOCIAL
// =============================================================================

/// Status of a friend request or reporter application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Backend numeric code (0 pending, 1 accepted, 2 rejected).
    pub fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::Rejected => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Accepted),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A friend request, sent or received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

impl FriendRequest {
    pub fn request_status(&self) -> Option<RequestStatus> {
        self.status.and_then(RequestStatus::from_code)
    }
}

/// An application to become a reporter, as listed for administrators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterApplication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Extract the calendar year from a backend timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS` and
/// bare dates.
pub fn parse_year(timestamp: &str) -> Option<i32> {
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.year());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, format) {
            return Some(dt.year());
        }
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
