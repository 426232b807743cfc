//! # teabreak-app
//!
//! Screens of the TeaBreak client built on the list pipeline, plus the author
//! picker and the tracing setup used by the `teabreak` binary.
//!
//! An [`App`] holds one backend shared by every screen it opens.

pub mod author_picker;
pub mod logging;
pub mod screens;

use std::sync::Arc;

use teabreak_client::{ClientConfig, HttpBackend};
use teabreak_core::{Error, MutationOutcome, RecordKey, Result, Session};

pub use author_picker::{AuthorSelection, EmailLookup, EmailSearch, UserDirectory};
pub use screens::{
    guard, AdminScreen, AdminTab, FilterOptions, FriendsScreen, FriendsTab, PaperDetail,
    PaperDetailScreen, PaperFilters, PapersScreen, ProfileScreen, ProfileView,
};

/// Shared backend and the session the screens are checked against.
#[derive(Debug, Clone)]
pub struct App {
    backend: Arc<HttpBackend>,
    session: Session,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(HttpBackend::new(config)?)))
    }

    pub fn with_backend(backend: Arc<HttpBackend>) -> Self {
        Self {
            backend,
            session: Session::anonymous(),
        }
    }

    pub fn backend(&self) -> &Arc<HttpBackend> {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sign in and load the resulting session.
    ///
    /// A rejected sign-in leaves the session anonymous and reports the
    /// backend's message as an unauthorized error.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&Session> {
        let outcome = self.backend.sign_in(email, password).await;
        if !outcome.ok {
            self.session = Session::anonymous();
            return Err(Error::Unauthorized(
                outcome.message.unwrap_or_else(|| "sign-in rejected".to_string()),
            ));
        }
        self.refresh_session().await
    }

    /// Sign out. The local session is dropped even if the backend call fails.
    pub async fn sign_out(&mut self) -> MutationOutcome {
        self.session = Session::anonymous();
        self.backend.sign_out().await
    }

    /// Re-read the session from the backend.
    pub async fn refresh_session(&mut self) -> Result<&Session> {
        self.session = self.backend.current_session().await?;
        Ok(&self.session)
    }

    pub fn papers(&self) -> PapersScreen {
        PapersScreen::new(Arc::clone(&self.backend))
    }

    pub fn paper(&self, paper_id: RecordKey) -> PaperDetailScreen {
        PaperDetailScreen::new(Arc::clone(&self.backend), paper_id)
    }

    pub fn friends(&self) -> FriendsScreen {
        FriendsScreen::new(Arc::clone(&self.backend))
    }

    pub fn admin(&self) -> AdminScreen {
        AdminScreen::new(Arc::clone(&self.backend))
    }

    pub fn profile(&self) -> ProfileScreen {
        ProfileScreen::new(Arc::clone(&self.backend))
    }

    pub fn email_search(&self) -> EmailSearch<Arc<HttpBackend>> {
        EmailSearch::new(Arc::clone(&self.backend))
    }
}
