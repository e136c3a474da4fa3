//! Session persistence in a JSON file
//!
//! The file holds a flat object of string entries, for example
//! `{"access": "...", "refresh": "..."}`. A missing file is an empty
//! session. Every operation reads the file fresh so that separate
//! processes observe each other's logins and logouts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;

use super::{SessionKey, SessionStore};
use crate::error::{Result, YummyError};

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store that uses the given file.
    ///
    /// The file and its parent directory are created on first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `session.json` in the user's data directory.
    ///
    /// # Errors
    ///
    /// Returns [`YummyError::Session`] if the platform data directory
    /// cannot be determined.
    pub fn in_data_dir() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "yummy", "yummy")
            .ok_or_else(|| YummyError::Session("Could not determine data directory".into()))?;
        Ok(Self::new(proj_dirs.data_dir().join("session.json")))
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let entries = serde_json::from_str(&contents).map_err(|e| {
            YummyError::Session(format!(
                "Malformed session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(entries)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for session file")?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open session file {}", self.path.display()))?;

        // `mode` only applies at creation; tighten files left by older writes.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key.as_str()))
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: SessionKey) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.read_entries()?;
        if entries.remove(key.as_str()).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (FileSessionStore, TempDir) {
        let dir = TempDir::new().expect("failed to create tempdir");
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        (store, dir)
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let (store, _dir) = temp_store();
        assert!(store.get(SessionKey::Access).unwrap().is_none());
    }

    #[test]
    fn test_set_creates_parent_and_persists() {
        let (store, _dir) = temp_store();
        store.set(SessionKey::Access, "abc").unwrap();
        assert!(store.path().exists());

        let reopened = FileSessionStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.get(SessionKey::Access).unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_file_uses_storage_key_names() {
        let (store, _dir) = temp_store();
        store.set(SessionKey::Access, "a").unwrap();
        store.set(SessionKey::Refresh, "r").unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["access"], "a");
        assert_eq!(value["refresh"], "r");
    }

    #[test]
    fn test_remove_keeps_other_entries() {
        let (store, _dir) = temp_store();
        store.set(SessionKey::Access, "a").unwrap();
        store.set(SessionKey::Refresh, "r").unwrap();
        store.remove(SessionKey::Access).unwrap();

        assert!(store.get(SessionKey::Access).unwrap().is_none());
        assert_eq!(store.get(SessionKey::Refresh).unwrap().as_deref(), Some("r"));
    }

    #[test]
    fn test_remove_without_file_is_noop() {
        let (store, _dir) = temp_store();
        store.remove(SessionKey::Refresh).unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = temp_store();
        store.set(SessionKey::Access, "secret").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_open_file_is_tightened_and_truncated() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"access": "a-much-longer-previous-token", "refresh": "r"}"#,
        )
        .unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.remove(SessionKey::Access).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("previous-token"));
        assert_eq!(store.get(SessionKey::Refresh).unwrap().as_deref(), Some("r"));
    }

    #[test]
    fn test_malformed_file_is_session_error() {
        let (store, _dir) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.get(SessionKey::Access).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<YummyError>(),
            Some(YummyError::Session(_))
        ));
    }
}
