//! Backend API abstraction
//!
//! This module defines the [`Backend`] trait that every view talks to,
//! and the wire types it exchanges. [`http::HttpBackend`] is the reqwest
//! implementation against a running Yummy server.
//!
//! Every method takes the access credential explicitly. Components obtain
//! it from [`crate::session::SessionContext`]; the backend never reads
//! session storage.
//!
//! | Method | Path |
//! |---|---|
//! | [`Backend::fetch_profile`] | `GET dashboard/api/V1/my-profile/` |
//! | [`Backend::update_profile`] | `PATCH dashboard/api/V1/my-profile/` (multipart) |
//! | [`Backend::list_reservations`] | `GET reservations/api/V1/user-reservations/` |
//! | [`Backend::fetch_account`] | `GET accounts/api/V1/profile/` |

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{AccountProfile, ImageField, ProfileResponse, ProfileUpdate, Reservation};

/// Editable profile resource, relative to the backend origin.
pub const MY_PROFILE_PATH: &str = "dashboard/api/V1/my-profile/";

/// Reservations of the authenticated user.
pub const USER_RESERVATIONS_PATH: &str = "reservations/api/V1/user-reservations/";

/// Basic account profile (includes the login email).
pub const ACCOUNT_PROFILE_PATH: &str = "accounts/api/V1/profile/";

/// Authenticated operations offered by the Yummy backend.
///
/// Implementations must map a rejected credential (401/403) to
/// [`crate::error::YummyError::Unauthorized`] so callers can tell it apart
/// from other failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Reads the editable profile.
    async fn fetch_profile(&self, access: &str) -> Result<ProfileResponse>;

    /// Partially updates the profile and returns the stored result.
    async fn update_profile(&self, access: &str, update: ProfileUpdate) -> Result<ProfileResponse>;

    /// Lists the user's reservations in backend order.
    async fn list_reservations(&self, access: &str) -> Result<Vec<Reservation>>;

    /// Reads the basic account profile.
    async fn fetch_account(&self, access: &str) -> Result<AccountProfile>;
}
