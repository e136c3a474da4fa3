//! Reservation list loader
//!
//! Fetches the user's reservations once per dashboard mount and exposes
//! them as a [`ReservationView`]. A failed fetch is indistinguishable from
//! an empty list in the rendered view; the error is only logged.

use std::sync::Arc;

use crate::api::{Backend, Reservation};
use crate::error::YummyError;
use crate::session::SessionContext;

/// Fetch lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationState {
    /// Request not finished yet
    Loading,
    /// Backend returned these reservations, in its order
    Loaded(Vec<Reservation>),
    /// Request failed or there was no session
    Failed,
}

/// What the reservations panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationView<'a> {
    /// Loading indicator
    Spinner,
    /// "No reservations found" message
    Empty,
    /// One card per reservation
    Items(&'a [Reservation]),
}

/// Loads and holds the reservation list for one dashboard mount.
pub struct ReservationList {
    backend: Arc<dyn Backend>,
    session: Arc<SessionContext>,
    state: ReservationState,
}

impl ReservationList {
    /// Creates a list in the `Loading` state.
    pub fn new(backend: Arc<dyn Backend>, session: Arc<SessionContext>) -> Self {
        Self {
            backend,
            session,
            state: ReservationState::Loading,
        }
    }

    /// Fetches the reservations. Never fails; errors end in `Failed`.
    pub async fn load(&mut self) {
        self.state = ReservationState::Loading;

        let access = match self.session.current() {
            Ok(Some(session)) => session.access,
            Ok(None) => {
                tracing::warn!("Reservation load skipped: no access credential");
                self.state = ReservationState::Failed;
                return;
            }
            Err(e) => {
                tracing::warn!("Reservation load skipped: {:#}", e);
                self.state = ReservationState::Failed;
                return;
            }
        };

        self.state = match self.backend.list_reservations(&access).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Reservations loaded");
                ReservationState::Loaded(items)
            }
            Err(e) => {
                match e.downcast_ref::<YummyError>() {
                    Some(err) if err.is_unauthorized() => {
                        tracing::warn!("Reservation load rejected, access credential may be expired")
                    }
                    _ => tracing::error!("Failed to load reservations: {:#}", e),
                }
                ReservationState::Failed
            }
        };
    }

    /// Current fetch state.
    pub fn state(&self) -> &ReservationState {
        &self.state
    }

    /// Presentation of the current state.
    pub fn view(&self) -> ReservationView<'_> {
        match &self.state {
            ReservationState::Loading => ReservationView::Spinner,
            ReservationState::Loaded(items) if !items.is_empty() => ReservationView::Items(items),
            ReservationState::Loaded(_) | ReservationState::Failed => ReservationView::Empty,
        }
    }
}
