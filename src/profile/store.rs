//! Shared profile cache
//!
//! One [`ProfileStore`] exists per session. The dashboard publishes into
//! it after every load and successful save; the header reads from it and
//! only fetches when it is empty. Subscribers are notified through a
//! `tokio::sync::watch` channel.

use tokio::sync::watch;

use super::Profile;
use crate::api::Backend;
use crate::error::Result;

/// Authoritative in-memory profile for the current session.
#[derive(Debug)]
pub struct ProfileStore {
    tx: watch::Sender<Option<Profile>>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Cached profile, if any.
    pub fn current(&self) -> Option<Profile> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish and invalidation.
    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.tx.subscribe()
    }

    /// Replaces the cached profile.
    pub fn publish(&self, profile: Profile) {
        self.tx.send_replace(Some(profile));
    }

    /// Drops the cached profile; the next reader fetches again.
    pub fn invalidate(&self) {
        self.tx.send_replace(None);
    }

    /// Returns the cached profile or fetches and caches it.
    ///
    /// # Errors
    ///
    /// Propagates the backend error when the cache is empty and the fetch
    /// fails. Nothing is cached in that case.
    pub async fn get_or_fetch(
        &self,
        backend: &dyn Backend,
        access: &str,
        sentinel: &str,
    ) -> Result<Profile> {
        if let Some(profile) = self.current() {
            return Ok(profile);
        }
        let response = backend.fetch_profile(access).await?;
        let profile = Profile::from_response(response, sentinel);
        self.publish(profile.clone());
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockBackend, ProfileResponse};
    use crate::profile::ProfileFields;

    fn ana() -> Profile {
        Profile {
            fields: ProfileFields {
                first_name: "Ana".to_string(),
                ..ProfileFields::default()
            },
            image: None,
        }
    }

    #[test]
    fn test_publish_and_invalidate_notify_subscribers() {
        let store = ProfileStore::new();
        let mut rx = store.subscribe();
        assert!(store.current().is_none());

        store.publish(ana());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().clone(), Some(ana()));

        store.invalidate();
        assert!(rx.has_changed().unwrap());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_publish_without_subscribers_still_caches() {
        let store = ProfileStore::new();
        store.publish(ana());
        assert_eq!(store.current(), Some(ana()));
    }

    #[tokio::test]
    async fn test_get_or_fetch_uses_cache() {
        let store = ProfileStore::new();
        store.publish(ana());

        let mut backend = MockBackend::new();
        backend.expect_fetch_profile().times(0);

        let profile = store.get_or_fetch(&backend, "tok", "default.png").await.unwrap();
        assert_eq!(profile.fields.first_name, "Ana");
    }

    #[tokio::test]
    async fn test_get_or_fetch_fills_empty_cache_once() {
        let store = ProfileStore::new();
        let mut backend = MockBackend::new();
        backend.expect_fetch_profile().times(1).returning(|_| {
            Ok(ProfileResponse {
                first_name: "Ana".to_string(),
                image: Some("/media/default.png".to_string()),
                ..ProfileResponse::default()
            })
        });

        let first = store.get_or_fetch(&backend, "tok", "default.png").await.unwrap();
        let second = store.get_or_fetch(&backend, "tok", "default.png").await.unwrap();
        assert_eq!(first, second);
        assert!(first.image.is_none());
    }

    #[tokio::test]
    async fn test_get_or_fetch_failure_caches_nothing() {
        let store = ProfileStore::new();
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_profile()
            .returning(|_| Err(crate::error::YummyError::Unauthorized(401).into()));

        assert!(store.get_or_fetch(&backend, "tok", "default.png").await.is_err());
        assert!(store.current().is_none());
    }
}
