//! User dashboard
//!
//! Composes the session guard, the profile editor and the reservation
//! list. Mounting checks the session before anything else: a visitor
//! without an access credential is redirected and no request is made.

use std::sync::Arc;

use crate::api::Backend;
use crate::config::ProfileConfig;
use crate::error::Result;
use crate::navigation::{Navigation, Route};
use crate::profile::{ProfileStore, ProfileSync};
use crate::reservations::ReservationList;
use crate::session::{GuardOutcome, SessionContext};

/// Result of mounting the dashboard
pub enum Mount {
    /// Guard refused; carry out this navigation instead
    Redirect(Navigation),
    /// Dashboard is loaded and ready
    Mounted(Dashboard),
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mount::Redirect(nav) => f.debug_tuple("Redirect").field(nav).finish(),
            Mount::Mounted(_) => f.write_str("Mounted(..)"),
        }
    }
}

/// Mounted dashboard: profile editor plus reservation list.
pub struct Dashboard {
    session: Arc<SessionContext>,
    store: Arc<ProfileStore>,
    profile: ProfileSync,
    reservations: ReservationList,
}

impl Dashboard {
    /// Guards, then loads profile and reservations concurrently.
    ///
    /// Both loads always settle; failures leave their panel in a degraded
    /// state rather than failing the mount.
    pub async fn mount(
        session: Arc<SessionContext>,
        backend: Arc<dyn Backend>,
        store: Arc<ProfileStore>,
        config: &ProfileConfig,
    ) -> Mount {
        if let GuardOutcome::RedirectToLogin = session.guard() {
            tracing::info!("Dashboard requires login, redirecting");
            return Mount::Redirect(Navigation::Redirect(Route::Login));
        }

        let mut profile = ProfileSync::new(
            Arc::clone(&backend),
            Arc::clone(&session),
            Arc::clone(&store),
            config.default_image_sentinel.clone(),
        );
        let mut reservations = ReservationList::new(backend, Arc::clone(&session));

        tokio::join!(profile.load(), reservations.load());

        Mount::Mounted(Dashboard {
            session,
            store,
            profile,
            reservations,
        })
    }

    /// Profile editor.
    pub fn profile(&self) -> &ProfileSync {
        &self.profile
    }

    /// Mutable profile editor.
    pub fn profile_mut(&mut self) -> &mut ProfileSync {
        &mut self.profile
    }

    /// Reservation list.
    pub fn reservations(&self) -> &ReservationList {
        &self.reservations
    }

    /// Fetches the reservation list again.
    pub async fn reload_reservations(&mut self) {
        self.reservations.load().await;
    }

    /// Signs out and leaves the dashboard.
    ///
    /// Consumes the dashboard, releasing any live avatar preview.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be cleared.
    pub fn logout(self) -> Result<Navigation> {
        self.session.logout()?;
        self.store.invalidate();
        Ok(Navigation::Redirect(Route::Login))
    }
}
