//! Session persistence via OS keyring
//!
//! Each session entry is stored as its own keyring password under the
//! `yummy` service, with the entry name (`access`, `refresh`) as the user.
//! The keyring is stateless; [`KeyringSessionStore`] only carries the
//! service name.

use super::{SessionKey, SessionStore};
use crate::error::{Result, YummyError};

/// Default keyring service name.
const SERVICE_NAME: &str = "yummy";

/// Session store backed by the OS native credential store
/// (Keychain on macOS, Secret Service on Linux, Credential Manager on Windows).
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service: String,
}

impl KeyringSessionStore {
    /// Creates a store under the default `yummy` service.
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Creates a store under a custom service name.
    ///
    /// Separate services keep sessions for different backends apart.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: SessionKey) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key.as_str())
            .map_err(|e| YummyError::Keyring(e).into())
    }
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(YummyError::Keyring(e).into()),
        }
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(YummyError::Keyring)?;
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<()> {
        match self.entry(key)?.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(YummyError::Keyring(e).into()),
        }
    }
}
