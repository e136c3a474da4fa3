//! In-process session store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{SessionKey, SessionStore};
use crate::error::{Result, YummyError};

/// Session store backed by a map in process memory.
///
/// Nothing survives the process; useful for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SessionKey, String>>> {
        self.entries
            .lock()
            .map_err(|_| YummyError::Session("memory session store poisoned".to_string()).into())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemorySessionStore::new();
        assert!(store.get(SessionKey::Access).unwrap().is_none());

        store.set(SessionKey::Access, "tok").unwrap();
        assert_eq!(store.get(SessionKey::Access).unwrap().as_deref(), Some("tok"));
        assert!(store.get(SessionKey::Refresh).unwrap().is_none());

        store.remove(SessionKey::Access).unwrap();
        assert!(store.get(SessionKey::Access).unwrap().is_none());
    }
}
