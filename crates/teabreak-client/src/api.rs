//! Session calls and mutations.
//!
//! Mutations never refresh anything themselves. Each returns a
//! [`MutationOutcome`] naming the list it invalidated; backend rejections and
//! transport errors both come back as a failed outcome carrying the message.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use teabreak_core::{
    Error, MutationOutcome, Record, RecordKey, RefreshScope, RequestStatus, Result, Session,
    UserProfile,
};

use crate::envelope::Envelope;
use crate::http::HttpBackend;

/// Timestamp format the backend expects for mute deadlines (UTC).
pub const BAN_UNTIL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a mute deadline for `/Users/Mute`.
pub fn format_ban_until(until: DateTime<Utc>) -> String {
    until.format(BAN_UNTIL_FORMAT).to_string()
}

fn outcome(operation: &str, result: Result<Envelope>, refresh: RefreshScope) -> MutationOutcome {
    match result.and_then(Envelope::into_data) {
        Ok(data) => {
            info!(subsystem = "client", op = operation, success = true, "Mutation complete");
            let created = data.get("id").and_then(RecordKey::from_value);
            MutationOutcome::succeeded(refresh, None).with_created(created)
        }
        Err(e) => {
            warn!(subsystem = "client", op = operation, success = false, error = %e, "Mutation failed");
            let message = match e {
                Error::Backend { message, .. } => message,
                other => other.to_string(),
            };
            MutationOutcome::failed(message)
        }
    }
}

fn rejected(operation: &str, reason: &str) -> MutationOutcome {
    warn!(subsystem = "client", op = operation, reason, "Mutation rejected before sending");
    MutationOutcome::failed(reason)
}

impl HttpBackend {
    // =========================================================================
    // SESSION
    // =========================================================================

    /// Sign in with email and password. The session cookie is kept by the
    /// client for later requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> MutationOutcome {
        if email.trim().is_empty() || password.is_empty() {
            return rejected("sign_in", "Email and password are required");
        }
        let result = self
            .post_form(
                "/Users/UserLogin",
                &[("email", email.trim().to_string()), ("password", password.to_string())],
            )
            .await;
        outcome("sign_in", result, RefreshScope::Session)
    }

    pub async fn sign_out(&self) -> MutationOutcome {
        let result = self.post_form("/Users/UserLogout", &[]).await;
        outcome("sign_out", result, RefreshScope::Session)
    }

    /// Session of the signed-in user.
    ///
    /// A backend rejection means nobody is signed in and yields an anonymous
    /// session; only transport failures are errors.
    pub async fn current_session(&self) -> Result<Session> {
        let envelope = self.get("/Users/GetInfo", &[]).await?;
        if !envelope.is_success() || envelope.data.is_null() {
            return Ok(Session::anonymous());
        }
        let user: UserProfile = serde_json::from_value(envelope.data)?;
        Ok(Session::signed_in(user))
    }

    /// Look a user up by exact email address.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let envelope = self
            .get("/Users/GetInfoByEmail", &[("email", email.trim().to_string())])
            .await?;
        if !envelope.is_success() || envelope.data.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(envelope.data)?))
    }

    /// A single paper as a record.
    pub async fn paper(&self, paper_id: &RecordKey) -> Result<Record> {
        let data = self
            .get("/Papers/GetPaperById", &[("paperId", paper_id.to_string())])
            .await?
            .into_data()?;
        if data.is_null() {
            return Err(Error::NotFound(format!("paper {}", paper_id)));
        }
        Ok(Record::from_value(data))
    }

    // =========================================================================
    // PAPERS
    // =========================================================================

    pub async fn delete_paper(&self, paper_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_form("/Papers/DeletePaper", &[("paperId", paper_id.to_string())])
            .await;
        outcome("delete_paper", result, RefreshScope::Papers)
    }

    /// Relate authors to a paper. `user_ids` is the comma-joined id list.
    pub async fn relate_authors(&self, paper_id: &RecordKey, user_ids: &str) -> MutationOutcome {
        if user_ids.trim().is_empty() {
            return rejected("relate_authors", "Select at least one author");
        }
        let result = self
            .post_form(
                "/PaperAuthor/Add",
                &[("paperId", paper_id.to_string()), ("userIds", user_ids.to_string())],
            )
            .await;
        outcome("relate_authors", result, RefreshScope::Papers)
    }

    pub async fn record_view(&self, paper_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_form("/PaperStatus/AddViewCount", &[("paperId", paper_id.to_string())])
            .await;
        outcome("record_view", result, RefreshScope::Nothing)
    }

    pub async fn record_download(&self, paper_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_form("/PaperStatus/AddDownloadCount", &[("paperId", paper_id.to_string())])
            .await;
        outcome("record_download", result, RefreshScope::Nothing)
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    pub async fn add_comment(&self, paper_id: &RecordKey, content: &str) -> MutationOutcome {
        if content.trim().is_empty() {
            return rejected("add_comment", "Comment cannot be empty");
        }
        let result = self
            .post_form(
                "/comments/AddPaperComment",
                &[("paperId", paper_id.to_string()), ("content", content.to_string())],
            )
            .await;
        outcome("add_comment", result, RefreshScope::Comments)
    }

    pub async fn add_reply(
        &self,
        paper_id: &RecordKey,
        parent_id: &RecordKey,
        content: &str,
    ) -> MutationOutcome {
        if content.trim().is_empty() {
            return rejected("add_reply", "Reply cannot be empty");
        }
        let result = self
            .post_form(
                "/comments/AddChildComment",
                &[
                    ("paperId", paper_id.to_string()),
                    ("pid", parent_id.to_string()),
                    ("content", content.to_string()),
                ],
            )
            .await;
        outcome("add_reply", result, RefreshScope::Comments)
    }

    pub async fn delete_comment(&self, comment_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_json("/comments/DeleteComment", &json!({"commentId": comment_id}))
            .await;
        outcome("delete_comment", result, RefreshScope::Comments)
    }

    // =========================================================================
    // SOCIAL
    // =========================================================================

    pub async fn add_friend_by_email(&self, email: &str, message: Option<&str>) -> MutationOutcome {
        let email = email.trim();
        if !email.contains('@') {
            return rejected("add_friend_by_email", "A valid email address is required");
        }
        let result = self
            .post_form(
                "/friendRequests/ApplyFriendByEmail",
                &[
                    ("email", email.to_string()),
                    ("message", message.unwrap_or_default().to_string()),
                ],
            )
            .await;
        outcome("add_friend_by_email", result, RefreshScope::FriendRequests)
    }

    /// Accept or reject a received friend request.
    pub async fn handle_friend_request(
        &self,
        request_id: &RecordKey,
        status: RequestStatus,
    ) -> MutationOutcome {
        if status == RequestStatus::Pending {
            return rejected("handle_friend_request", "A request can only be accepted or rejected");
        }
        let result = self
            .post_form(
                "/friendRequests/HandleFriendApply",
                &[("applyId", request_id.to_string()), ("status", status.code().to_string())],
            )
            .await;
        outcome("handle_friend_request", result, RefreshScope::FriendRequests)
    }

    pub async fn delete_friend(&self, friend_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_form("/friends/DeleteFriend", &[("friendId", friend_id.to_string())])
            .await;
        outcome("delete_friend", result, RefreshScope::Friends)
    }

    pub async fn follow(&self, user_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_json("/friends/AddFollow", &json!({"userId": user_id}))
            .await;
        outcome("follow", result, RefreshScope::Follows)
    }

    pub async fn unfollow(&self, user_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_json("/friends/CancelFollow", &json!({"userId": user_id}))
            .await;
        outcome("unfollow", result, RefreshScope::Follows)
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Mute a user until the given instant.
    pub async fn mute_user(&self, user_id: &RecordKey, until: DateTime<Utc>) -> MutationOutcome {
        let result = self
            .post_form(
                "/Users/Mute",
                &[("userId", user_id.to_string()), ("datetime", format_ban_until(until))],
            )
            .await;
        outcome("mute_user", result, RefreshScope::Users)
    }

    /// Lift a mute. The backend has no unmute call; muting until now ends it.
    pub async fn unmute_user(&self, user_id: &RecordKey) -> MutationOutcome {
        self.mute_user(user_id, Utc::now()).await
    }

    pub async fn delete_user(&self, user_id: &RecordKey) -> MutationOutcome {
        let result = self
            .post_form("/Users/DeleteUser", &[("userId", user_id.to_string())])
            .await;
        outcome("delete_user", result, RefreshScope::Users)
    }

    /// Approve (`true`) or reject a reporter application.
    pub async fn review_reporter(&self, application_id: &RecordKey, approve: bool) -> MutationOutcome {
        let status = if approve {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        let result = self
            .post_form(
                "/ReporterApply/ApproveRegister",
                &[("id", application_id.to_string()), ("status", status.code().to_string())],
            )
            .await;
        outcome("review_reporter", result, RefreshScope::ReporterApplications)
    }

    /// Apply to become a reporter. The attachment itself is uploaded separately.
    pub async fn apply_as_reporter(&self, note: &str, with_attachment: bool) -> MutationOutcome {
        if note.trim().is_empty() {
            return rejected("apply_as_reporter", "Application note cannot be empty");
        }
        let file_tag = if with_attachment { "1" } else { "0" };
        let result = self
            .post_form(
                "/ReporterApply/ReporterRegister",
                &[("applyNote", note.to_string()), ("fileTag", file_tag.to_string())],
            )
            .await;
        outcome("apply_as_reporter", result, RefreshScope::Profile)
    }
}
