//! Session guard and credential storage
//!
//! The session is two string entries, `access` and `refresh`, kept in a
//! persisted key-value store. [`SessionContext`] is the only type that
//! reads or writes those entries; every component receives an
//! `Arc<SessionContext>` and asks it whether the visitor is authenticated.
//!
//! Storage backends live in submodules:
//!
//! - [`file::FileSessionStore`] -- JSON file in the user's data directory
//! - [`os_keyring::KeyringSessionStore`] -- OS native credential store
//! - [`memory::MemorySessionStore`] -- in-process map, used by tests
//!
//! No expiry is tracked locally. A stored access token is trusted until a
//! backend request rejects it.

use std::fmt;
use std::sync::Arc;

use crate::config::{SessionBackend, SessionConfig};
use crate::error::Result;
use crate::navigation::{Navigation, Route};

pub mod file;
pub mod memory;
pub mod os_keyring;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use os_keyring::KeyringSessionStore;

/// Names of the persisted session entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Bearer credential sent on every authenticated request
    Access,
    /// Refresh credential, stored but never used by this client
    Refresh,
}

impl SessionKey {
    /// Storage key for the entry
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Access => "access",
            SessionKey::Refresh => "refresh",
        }
    }

    /// All entries, in the order they are cleared on logout
    pub fn all() -> [SessionKey; 2] {
        [SessionKey::Access, SessionKey::Refresh]
    }
}

/// Persisted key-value storage for session entries
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Read an entry; `Ok(None)` when it was never set or has been removed
    fn get(&self, key: SessionKey) -> Result<Option<String>>;

    /// Write an entry, replacing any previous value
    fn set(&self, key: SessionKey, value: &str) -> Result<()>;

    /// Remove an entry; removing a missing entry is a no-op
    fn remove(&self, key: SessionKey) -> Result<()>;
}

/// Credentials of an authenticated visitor
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Access token sent as `Authorization: Bearer <access>`
    pub access: String,
    /// Refresh token, if the login flow issued one
    pub refresh: Option<String>,
}

impl Session {
    /// Creates a session with only an access token.
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
        }
    }

    /// Attaches a refresh token.
    pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Result of checking the session before mounting a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// An access credential is stored; the view may mount
    Authenticated(Session),
    /// No access credential; the view must not initialize
    RedirectToLogin,
}

impl GuardOutcome {
    /// Navigation the front end should perform, if any
    pub fn navigation(&self) -> Option<Navigation> {
        match self {
            GuardOutcome::Authenticated(_) => None,
            GuardOutcome::RedirectToLogin => Some(Navigation::Redirect(Route::Login)),
        }
    }
}

/// Single source of truth for "is the visitor authenticated, and with what"
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Wraps an existing store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Opens the store selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the file backend cannot determine a data
    /// directory and no explicit path is configured.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match config.backend {
            SessionBackend::File => match &config.path {
                Some(path) => Arc::new(FileSessionStore::new(path.clone())),
                None => Arc::new(FileSessionStore::in_data_dir()?),
            },
            SessionBackend::Keyring => Arc::new(KeyringSessionStore::new()),
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        };
        tracing::debug!(backend = ?config.backend, "Opened session store");
        Ok(Self::new(store))
    }

    /// Reads the stored session.
    ///
    /// An empty access entry counts as absent.
    pub fn current(&self) -> Result<Option<Session>> {
        let access = match self.store.get(SessionKey::Access)? {
            Some(access) if !access.is_empty() => access,
            _ => return Ok(None),
        };
        let refresh = self
            .store
            .get(SessionKey::Refresh)?
            .filter(|r| !r.is_empty());
        Ok(Some(Session { access, refresh }))
    }

    /// Returns `true` when an access credential is stored.
    ///
    /// Storage errors are logged and treated as unauthenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.guard(), GuardOutcome::Authenticated(_))
    }

    /// Gatekeeping check run before any protected view initializes.
    pub fn guard(&self) -> GuardOutcome {
        match self.current() {
            Ok(Some(session)) => GuardOutcome::Authenticated(session),
            Ok(None) => {
                tracing::debug!("No access credential stored, redirecting to login");
                GuardOutcome::RedirectToLogin
            }
            Err(e) => {
                tracing::warn!("Failed to read session store: {:#}", e);
                GuardOutcome::RedirectToLogin
            }
        }
    }

    /// Persists credentials issued by the backend login flow.
    pub fn establish(&self, session: &Session) -> Result<()> {
        self.store.set(SessionKey::Access, &session.access)?;
        match &session.refresh {
            Some(refresh) => self.store.set(SessionKey::Refresh, refresh)?,
            None => self.store.remove(SessionKey::Refresh)?,
        }
        tracing::info!("Session established");
        Ok(())
    }

    /// Clears every stored credential.
    ///
    /// After this returns, [`guard`](Self::guard) yields
    /// [`GuardOutcome::RedirectToLogin`].
    pub fn logout(&self) -> Result<()> {
        for key in SessionKey::all() {
            self.store.remove(key)?;
        }
        tracing::info!("Session cleared");
        Ok(())
    }
}
