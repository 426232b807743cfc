//! Explicit session context.
//!
//! Screens receive the signed-in user as a value instead of reading shared
//! global state, so access decisions are visible at every call site.

use serde::Serialize;

use crate::models::UserProfile;

/// Result of an access check for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// Nobody is signed in.
    RedirectLogin,
    /// Signed in without the required role.
    RedirectHome,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Access::Granted
    }
}

/// Who is using the client right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: UserProfile) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::is_admin)
    }

    /// Any signed-in user may proceed.
    pub fn require_user(&self) -> Access {
        if self.is_signed_in() {
            Access::Granted
        } else {
            Access::RedirectLogin
        }
    }

    /// Only administrators may proceed.
    pub fn require_admin(&self) -> Access {
        match &self.user {
            None => Access::RedirectLogin,
            Some(user) if user.is_admin() => Access::Granted,
            Some(_) => Access::RedirectHome,
        }
    }
}
