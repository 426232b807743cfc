//! Screen orchestration.
//!
//! A screen owns one [`Pipeline`] per list it shows, checks access against
//! the explicit [`Session`] it is given, and re-runs a list only when a
//! mutation's outcome says that list was invalidated.

pub mod admin;
pub mod friends;
pub mod paper_detail;
pub mod papers;
pub mod profile;

use std::sync::Arc;

use teabreak_client::HttpBackend;
use teabreak_core::{Access, Error, Result};
use teabreak_pipeline::Pipeline;

pub use admin::{AdminScreen, AdminTab};
pub use friends::{FriendsScreen, FriendsTab};
pub use paper_detail::{PaperDetail, PaperDetailScreen};
pub use papers::{FilterOptions, PaperFilters, PapersScreen};
pub use profile::{ProfileScreen, ProfileView};

/// Pipeline over the live backend.
pub type ListPipeline = Pipeline<Arc<HttpBackend>>;

/// Turn a denied access check into the matching error.
pub fn guard(access: Access) -> Result<()> {
    match access {
        Access::Granted => Ok(()),
        Access::RedirectLogin => Err(Error::Unauthorized(
            "sign in to continue".to_string(),
        )),
        Access::RedirectHome => Err(Error::Forbidden(
            "administrator role required".to_string(),
        )),
    }
}
