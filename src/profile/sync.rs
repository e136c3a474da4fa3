//! Dashboard profile editor
//!
//! [`ProfileSync`] owns the draft profile while the dashboard is mounted:
//!
//! ```text
//! Loading --load--> Ready --edit/select/clear--> Editing --save--> Saving --ok--> Ready
//!                     ^                            |                  |
//!                     +----------- cancel ---------+                  +--err--> Editing
//! ```
//!
//! Save is refused while `Loading` or `Saving`, so a draft is never
//! submitted before the backend copy has arrived. Load failures are not
//! errors: the form stays usable with blank fields and `is_degraded()`
//! reports the condition. Save failures keep the draft and return an
//! [`Acknowledgment::Failed`]. A load or save whose future is dropped
//! mid-request leaves the editor in `Ready` (or the state the save started
//! from), never stuck in `Loading` or `Saving`.

use std::sync::Arc;

use super::{Profile, ProfileField, ProfileFields, ProfileStore};
use crate::api::{Backend, ImageField, ProfileUpdate};
use crate::avatar::{AvatarRef, PreviewRegistry, StagedFile};
use crate::error::{Result, YummyError};
use crate::session::SessionContext;

/// Where the editor is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Waiting for the initial profile read
    Loading,
    /// Showing the backend copy (or a blank form after a failed load)
    Ready,
    /// Draft differs from what was loaded
    Editing,
    /// Update request in flight
    Saving,
}

/// User-visible result of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Backend accepted the update; the draft now mirrors its response
    Saved,
    /// Update did not go through; the draft is unchanged
    Failed(String),
}

impl Acknowledgment {
    /// Short message for the user.
    pub fn message(&self) -> String {
        match self {
            Acknowledgment::Saved => "Profile updated successfully.".to_string(),
            Acknowledgment::Failed(reason) => format!("Failed to update profile: {}", reason),
        }
    }
}

/// Editable-profile state machine backing the dashboard form.
pub struct ProfileSync {
    backend: Arc<dyn Backend>,
    session: Arc<SessionContext>,
    store: Arc<ProfileStore>,
    previews: Arc<PreviewRegistry>,
    sentinel: String,
    state: SyncState,
    draft: ProfileFields,
    avatar: AvatarRef,
    staged: Option<StagedFile>,
    avatar_cleared: bool,
    degraded: bool,
}

impl ProfileSync {
    /// Creates an editor in the `Loading` state.
    ///
    /// # Arguments
    ///
    /// * `backend` - Backend used for the profile read and update
    /// * `session` - Source of the access credential
    /// * `store` - Shared profile cache updated after load and save
    /// * `sentinel` - File name of the backend's default avatar
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Arc<SessionContext>,
        store: Arc<ProfileStore>,
        sentinel: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            session,
            store,
            previews: PreviewRegistry::new(),
            sentinel: sentinel.into(),
            state: SyncState::Loading,
            draft: ProfileFields::default(),
            avatar: AvatarRef::None,
            staged: None,
            avatar_cleared: false,
            degraded: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Draft text fields.
    pub fn draft(&self) -> &ProfileFields {
        &self.draft
    }

    /// Avatar currently displayed.
    pub fn avatar(&self) -> &AvatarRef {
        &self.avatar
    }

    /// File waiting for upload, if any.
    pub fn staged(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    /// `true` after a load that could not reach the backend copy.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Registry of local previews owned by this editor.
    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        &self.previews
    }

    /// Reads the profile from the backend and makes it the draft.
    ///
    /// Never fails: a missing session or a backend error leaves a blank
    /// form in the `Ready` state, sets the degraded flag and empties the
    /// shared store.
    pub async fn load(&mut self) {
        self.staged = None;
        self.avatar_cleared = false;

        let session = match self.session.current() {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::warn!("Profile load skipped: no access credential");
                self.apply_blank(true);
                return;
            }
            Err(e) => {
                tracing::warn!("Profile load skipped: {:#}", e);
                self.apply_blank(true);
                return;
            }
        };

        let backend = Arc::clone(&self.backend);
        let pending = PendingRequest::begin(&mut self.state, SyncState::Loading, SyncState::Ready);
        let result = backend.fetch_profile(&session.access).await;
        pending.finish();

        match result {
            Ok(response) => {
                let profile = Profile::from_response(response, &self.sentinel);
                tracing::debug!(has_avatar = profile.image.is_some(), "Profile loaded");
                self.apply_profile(&profile);
                self.degraded = false;
                self.store.publish(profile);
            }
            Err(e) => {
                if is_unauthorized(&e) {
                    tracing::warn!("Profile load rejected, access credential may be expired");
                } else {
                    tracing::warn!("Profile load failed: {:#}", e);
                }
                self.store.invalidate();
                self.apply_blank(true);
            }
        }
    }

    /// Replaces one draft field. No validation; empty strings are kept.
    pub fn edit_field(&mut self, field: ProfileField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.mark_edited();
    }

    /// Stages a file for upload and shows a local preview of it.
    ///
    /// Any previously staged file and its preview are released.
    pub fn select_avatar(&mut self, file: StagedFile) {
        let preview = self.previews.create(&file);
        self.avatar = AvatarRef::Preview(preview);
        self.staged = Some(file);
        self.avatar_cleared = false;
        self.mark_edited();
    }

    /// Removes the displayed avatar and any staged file.
    ///
    /// Takes effect on the backend only when followed by a save.
    pub fn clear_avatar(&mut self) {
        self.avatar = AvatarRef::None;
        self.staged = None;
        self.avatar_cleared = true;
        self.mark_edited();
    }

    /// Discards the draft and resets the form to blank.
    ///
    /// The form does not revert to the last loaded values.
    pub fn cancel(&mut self) {
        self.draft = ProfileFields::default();
        self.avatar = AvatarRef::None;
        self.staged = None;
        self.avatar_cleared = false;
        if self.state == SyncState::Editing {
            self.state = SyncState::Ready;
        }
    }

    /// Payload the next save would send.
    pub fn build_update(&self) -> ProfileUpdate {
        let image = match (&self.staged, self.avatar_cleared) {
            (Some(file), _) => ImageField::Upload(file.clone()),
            (None, true) => ImageField::Clear,
            (None, false) => ImageField::Omit,
        };
        ProfileUpdate {
            first_name: self.draft.first_name.clone(),
            last_name: self.draft.last_name.clone(),
            phone_number: self.draft.phone_number.clone(),
            image,
        }
    }

    /// Sends the draft to the backend.
    ///
    /// # Returns
    ///
    /// [`Acknowledgment::Saved`] after the backend accepted the update and
    /// the draft was replaced by its response; [`Acknowledgment::Failed`]
    /// when there is no session or the request failed, with the draft
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`YummyError::NotReady`] without contacting the backend
    /// while the initial load or another save is pending.
    pub async fn save(&mut self) -> Result<Acknowledgment> {
        let previous = match self.state {
            SyncState::Ready | SyncState::Editing => self.state,
            SyncState::Loading => {
                return Err(YummyError::NotReady("profile is still loading".to_string()).into())
            }
            SyncState::Saving => {
                return Err(YummyError::NotReady("a save is already in progress".to_string()).into())
            }
        };

        let session = match self.session.current() {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::warn!("Profile save refused: no access credential");
                return Ok(Acknowledgment::Failed("not signed in".to_string()));
            }
            Err(e) => {
                tracing::error!("Profile save refused: {:#}", e);
                return Ok(Acknowledgment::Failed("session unavailable".to_string()));
            }
        };

        let update = self.build_update();
        let backend = Arc::clone(&self.backend);
        let pending = PendingRequest::begin(&mut self.state, SyncState::Saving, previous);
        let result = backend.update_profile(&session.access, update).await;
        pending.finish();

        match result {
            Ok(response) => {
                let profile = Profile::from_response(response, &self.sentinel);
                self.apply_profile(&profile);
                self.staged = None;
                self.avatar_cleared = false;
                self.degraded = false;
                self.store.publish(profile);
                tracing::info!("Profile saved");
                Ok(Acknowledgment::Saved)
            }
            Err(e) => {
                tracing::error!("Profile save failed: {:#}", e);
                self.state = previous;
                let reason = match e.downcast_ref::<YummyError>() {
                    Some(YummyError::Unauthorized(_)) => "session expired or rejected".to_string(),
                    Some(YummyError::Api { status, .. }) => format!("server returned {}", status),
                    _ => "could not reach the server".to_string(),
                };
                Ok(Acknowledgment::Failed(reason))
            }
        }
    }

    fn mark_edited(&mut self) {
        if self.state == SyncState::Ready {
            self.state = SyncState::Editing;
        }
    }

    fn apply_profile(&mut self, profile: &Profile) {
        self.draft = profile.fields.clone();
        self.avatar = AvatarRef::from_server(profile.image.as_deref(), &self.sentinel);
        self.state = SyncState::Ready;
    }

    fn apply_blank(&mut self, degraded: bool) {
        self.draft = ProfileFields::default();
        self.avatar = AvatarRef::None;
        self.degraded = degraded;
        self.state = SyncState::Ready;
    }
}

/// Marks a request as in flight and puts `state` back to `on_drop` if the
/// request future is dropped before [`finish`](Self::finish) runs.
struct PendingRequest<'a> {
    state: &'a mut SyncState,
    on_drop: SyncState,
    armed: bool,
}

impl<'a> PendingRequest<'a> {
    fn begin(state: &'a mut SyncState, pending: SyncState, on_drop: SyncState) -> Self {
        *state = pending;
        Self {
            state,
            on_drop,
            armed: true,
        }
    }

    fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(state = ?self.on_drop, "Profile request dropped before completion");
            *self.state = self.on_drop;
        }
    }
}

fn is_unauthorized(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<YummyError>()
        .map(YummyError::is_unauthorized)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockBackend, ProfileResponse};
    use crate::session::{MemorySessionStore, Session};
    use bytes::Bytes;
    use mockall::predicate::eq;

    fn session_with_token() -> Arc<SessionContext> {
        let ctx = SessionContext::new(Arc::new(MemorySessionStore::new()));
        ctx.establish(&Session::new("tok")).unwrap();
        Arc::new(ctx)
    }

    fn ana_response() -> ProfileResponse {
        ProfileResponse {
            first_name: "Ana".to_string(),
            last_name: "Rossi".to_string(),
            phone_number: "0912".to_string(),
            image: Some("http://127.0.0.1:8000/media/profile/ana.png".to_string()),
        }
    }

    fn png(name: &str) -> StagedFile {
        StagedFile::new(name, "image/png", Bytes::from_static(b"\x89PNG"))
    }

    fn editor(backend: MockBackend) -> (ProfileSync, Arc<ProfileStore>) {
        let store = Arc::new(ProfileStore::new());
        let sync = ProfileSync::new(
            Arc::new(backend),
            session_with_token(),
            store.clone(),
            "default.png",
        );
        (sync, store)
    }

    fn loaded_backend() -> MockBackend {
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_profile()
            .with(eq("tok"))
            .returning(|_| Ok(ana_response()));
        backend
    }

    #[tokio::test]
    async fn test_load_populates_draft_avatar_and_store() {
        let (mut sync, store) = editor(loaded_backend());
        assert_eq!(sync.state(), SyncState::Loading);

        sync.load().await;

        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.draft().first_name, "Ana");
        assert_eq!(
            sync.avatar().display_url(),
            Some("http://127.0.0.1:8000/media/profile/ana.png")
        );
        assert!(!sync.is_degraded());
        assert_eq!(store.current().unwrap().fields.first_name, "Ana");
    }

    #[tokio::test]
    async fn test_load_sentinel_image_shows_no_avatar() {
        let mut backend = MockBackend::new();
        backend.expect_fetch_profile().returning(|_| {
            Ok(ProfileResponse {
                first_name: "Ana".to_string(),
                image: Some("http://127.0.0.1:8000/media/default.png".to_string()),
                ..ProfileResponse::default()
            })
        });
        let (mut sync, _) = editor(backend);
        sync.load().await;
        assert!(sync.avatar().is_none());
        assert_eq!(sync.draft().first_name, "Ana");
    }

    #[tokio::test]
    async fn test_load_failure_is_degraded_blank_form() {
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_profile()
            .returning(|_| Err(YummyError::Unauthorized(401).into()));
        let (mut sync, store) = editor(backend);

        sync.load().await;

        assert_eq!(sync.state(), SyncState::Ready);
        assert!(sync.is_degraded());
        assert_eq!(sync.draft(), &ProfileFields::default());
        assert!(sync.avatar().is_none());
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_load_without_session_makes_no_call() {
        let mut backend = MockBackend::new();
        backend.expect_fetch_profile().times(0);
        let store = Arc::new(ProfileStore::new());
        let session = Arc::new(SessionContext::new(Arc::new(MemorySessionStore::new())));
        let mut sync = ProfileSync::new(Arc::new(backend), session, store, "default.png");

        sync.load().await;
        assert!(sync.is_degraded());
    }

    #[tokio::test]
    async fn test_edit_field_changes_one_field_and_enters_editing() {
        let (mut sync, _) = editor(loaded_backend());
        sync.load().await;

        sync.edit_field(ProfileField::PhoneNumber, "09120000000");

        assert_eq!(sync.state(), SyncState::Editing);
        assert_eq!(sync.draft().phone_number, "09120000000");
        assert_eq!(sync.draft().first_name, "Ana");
        assert_eq!(sync.draft().last_name, "Rossi");
    }

    #[tokio::test]
    async fn test_select_replaces_staged_file_and_preview() {
        let (mut sync, _) = editor(loaded_backend());
        sync.load().await;

        sync.select_avatar(png("a.png"));
        sync.select_avatar(png("b.png"));

        assert_eq!(sync.staged().unwrap().file_name, "b.png");
        assert_eq!(sync.previews().live_count(), 1);
        match sync.avatar() {
            AvatarRef::Preview(handle) => assert_eq!(handle.file_name(), "b.png"),
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clear_avatar_releases_preview_without_backend_call() {
        let (mut sync, _) = editor(loaded_backend());
        sync.load().await;
        sync.select_avatar(png("a.png"));

        sync.clear_avatar();

        assert!(sync.staged().is_none());
        assert!(sync.avatar().is_none());
        assert_eq!(sync.previews().live_count(), 0);
        assert!(matches!(sync.build_update().image, ImageField::Clear));
    }

    #[tokio::test]
    async fn test_cancel_resets_to_blank_not_loaded_values() {
        let (mut sync, _) = editor(loaded_backend());
        sync.load().await;
        sync.edit_field(ProfileField::FirstName, "Bea");
        sync.select_avatar(png("a.png"));

        sync.cancel();

        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.draft(), &ProfileFields::default());
        assert!(sync.avatar().is_none());
        assert!(sync.staged().is_none());
        assert_eq!(sync.previews().live_count(), 0);
    }

    #[tokio::test]
    async fn test_save_rejected_while_loading() {
        let mut backend = MockBackend::new();
        backend.expect_update_profile().times(0);
        let (mut sync, _) = editor(backend);

        let err = sync.save().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<YummyError>(),
            Some(YummyError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_save_without_staged_file_omits_image() {
        let mut backend = loaded_backend();
        backend
            .expect_update_profile()
            .withf(|access, update| {
                access == "tok"
                    && update.phone_number == "09120000000"
                    && matches!(update.image, ImageField::Omit)
            })
            .times(1)
            .returning(|_, update| {
                Ok(ProfileResponse {
                    first_name: "Ana".to_string(),
                    last_name: "Rossi".to_string(),
                    phone_number: update.phone_number,
                    image: Some("/media/profile/ana.png".to_string()),
                })
            });
        let (mut sync, store) = editor(backend);
        sync.load().await;
        sync.edit_field(ProfileField::PhoneNumber, "09120000000");

        let ack = sync.save().await.unwrap();

        assert_eq!(ack, Acknowledgment::Saved);
        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.draft().phone_number, "09120000000");
        assert_eq!(sync.avatar().display_url(), Some("/media/profile/ana.png"));
        assert_eq!(
            store.current().unwrap().fields.phone_number,
            "09120000000"
        );
    }

    #[tokio::test]
    async fn test_save_with_staged_file_uploads_and_clears_staging() {
        let mut backend = loaded_backend();
        backend
            .expect_update_profile()
            .withf(|_, update| {
                matches!(&update.image, ImageField::Upload(file) if file.file_name == "b.png")
            })
            .returning(|_, _| {
                Ok(ProfileResponse {
                    image: Some("/media/profile/b.png".to_string()),
                    ..ProfileResponse::default()
                })
            });
        let (mut sync, _) = editor(backend);
        sync.load().await;
        sync.select_avatar(png("b.png"));

        assert_eq!(sync.save().await.unwrap(), Acknowledgment::Saved);
        assert!(sync.staged().is_none());
        assert_eq!(sync.previews().live_count(), 0);
        assert_eq!(sync.avatar().display_url(), Some("/media/profile/b.png"));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_draft_and_staged_file() {
        let mut backend = loaded_backend();
        backend.expect_update_profile().returning(|_, _| {
            Err(YummyError::Api {
                status: 500,
                body: "oops".to_string(),
            }
            .into())
        });
        let (mut sync, store) = editor(backend);
        sync.load().await;
        sync.edit_field(ProfileField::LastName, "Bianchi");
        sync.select_avatar(png("a.png"));

        let ack = sync.save().await.unwrap();

        assert_eq!(ack, Acknowledgment::Failed("server returned 500".to_string()));
        assert_eq!(sync.state(), SyncState::Editing);
        assert_eq!(sync.draft().last_name, "Bianchi");
        assert_eq!(sync.staged().unwrap().file_name, "a.png");
        assert_eq!(sync.previews().live_count(), 1);
        assert_eq!(store.current().unwrap().fields.last_name, "Rossi");
    }

    #[tokio::test]
    async fn test_save_after_logout_fails_without_call() {
        let mut backend = loaded_backend();
        backend.expect_update_profile().times(0);
        let store = Arc::new(ProfileStore::new());
        let session = session_with_token();
        let mut sync = ProfileSync::new(Arc::new(backend), session.clone(), store, "default.png");
        sync.load().await;
        session.logout().unwrap();

        let ack = sync.save().await.unwrap();
        assert_eq!(ack, Acknowledgment::Failed("not signed in".to_string()));
    }

    /// Answers reads immediately and holds updates for an hour.
    struct StalledUpdates;

    #[async_trait::async_trait]
    impl Backend for StalledUpdates {
        async fn fetch_profile(&self, _access: &str) -> Result<ProfileResponse> {
            Ok(ana_response())
        }

        async fn update_profile(
            &self,
            _access: &str,
            _update: ProfileUpdate,
        ) -> Result<ProfileResponse> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok(ana_response())
        }

        async fn list_reservations(&self, _access: &str) -> Result<Vec<crate::api::Reservation>> {
            Ok(Vec::new())
        }

        async fn fetch_account(&self, _access: &str) -> Result<crate::api::AccountProfile> {
            Ok(crate::api::AccountProfile::default())
        }
    }

    /// Holds profile reads for an hour.
    struct StalledReads;

    #[async_trait::async_trait]
    impl Backend for StalledReads {
        async fn fetch_profile(&self, _access: &str) -> Result<ProfileResponse> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok(ana_response())
        }

        async fn update_profile(
            &self,
            _access: &str,
            _update: ProfileUpdate,
        ) -> Result<ProfileResponse> {
            Ok(ana_response())
        }

        async fn list_reservations(&self, _access: &str) -> Result<Vec<crate::api::Reservation>> {
            Ok(Vec::new())
        }

        async fn fetch_account(&self, _access: &str) -> Result<crate::api::AccountProfile> {
            Ok(crate::api::AccountProfile::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_save_restores_previous_state() {
        let store = Arc::new(ProfileStore::new());
        let mut sync = ProfileSync::new(
            Arc::new(StalledUpdates),
            session_with_token(),
            store,
            "default.png",
        );
        sync.load().await;
        sync.edit_field(ProfileField::FirstName, "Bea");

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_secs(1), sync.save()).await;
        assert!(timed_out.is_err());

        assert_eq!(sync.state(), SyncState::Editing);
        assert_eq!(sync.draft().first_name, "Bea");

        // A later save is accepted rather than refused as already in progress.
        let retry = tokio::time::timeout(std::time::Duration::from_secs(1), sync.save()).await;
        assert!(retry.is_err());
        assert_eq!(sync.state(), SyncState::Editing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_load_leaves_form_ready() {
        let mut sync = ProfileSync::new(
            Arc::new(StalledReads),
            session_with_token(),
            Arc::new(ProfileStore::new()),
            "default.png",
        );

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_secs(1), sync.load()).await;
        assert!(timed_out.is_err());

        assert_eq!(sync.state(), SyncState::Ready);
        sync.edit_field(ProfileField::LastName, "Bianchi");
        assert_eq!(sync.state(), SyncState::Editing);
        assert_eq!(sync.save().await.unwrap(), Acknowledgment::Saved);
    }

    #[tokio::test]
    async fn test_failed_reload_empties_shared_store() {
        let mut backend = MockBackend::new();
        let mut calls = 0;
        backend.expect_fetch_profile().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(ana_response())
            } else {
                Err(YummyError::Api {
                    status: 502,
                    body: String::new(),
                }
                .into())
            }
        });
        let (mut sync, store) = editor(backend);

        sync.load().await;
        assert!(store.current().is_some());

        sync.load().await;
        assert!(sync.is_degraded());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_acknowledgment_messages() {
        assert!(Acknowledgment::Saved.message().contains("updated"));
        assert!(Acknowledgment::Failed("x".to_string())
            .message()
            .contains("Failed"));
    }
}
