//! Avatar references, staged uploads and local previews
//!
//! A displayed avatar is one of three things: nothing, a remote image
//! served by the backend, or a local preview of a file the user has
//! selected but not yet saved. Previews are scoped resources: a
//! [`PreviewHandle`] registers itself in a [`PreviewRegistry`] when
//! created and revokes itself when dropped, so replacing or clearing the
//! displayed avatar always releases the previous preview.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use image::ImageFormat;
use uuid::Uuid;

use crate::error::{Result, YummyError};

/// Returns `true` when `image` points at the backend's "no avatar" file.
///
/// Only the final path segment is compared, so absolute URLs, relative
/// media paths and query strings are all handled.
///
/// # Examples
///
/// ```
/// use yummy::avatar::is_default_image;
///
/// assert!(is_default_image("http://127.0.0.1:8000/media/profile/default.png", "default.png"));
/// assert!(is_default_image("/media/default.png?v=2", "default.png"));
/// assert!(!is_default_image("/media/profile/ana.png", "default.png"));
/// ```
pub fn is_default_image(image: &str, sentinel: &str) -> bool {
    let path = match url::Url::parse(image) {
        Ok(url) => url.path().to_string(),
        Err(_) => image
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.trim_end_matches('/').rsplit('/').next() == Some(sentinel)
}

/// A locally selected image awaiting upload
#[derive(Clone)]
pub struct StagedFile {
    /// File name sent in the multipart part
    pub file_name: String,
    /// MIME type sent in the multipart part
    pub mime: String,
    /// File contents
    pub bytes: Bytes,
}

impl std::fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl StagedFile {
    /// Creates a staged file from bytes already in memory.
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads an image file from disk.
    ///
    /// The format comes from the extension, falling back to sniffing the
    /// contents.
    ///
    /// # Errors
    ///
    /// Returns [`YummyError::Avatar`] if the file cannot be read or is not
    /// a recognised image format.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            YummyError::Avatar(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let format = ImageFormat::from_path(path)
            .or_else(|_| image::guess_format(&bytes))
            .map_err(|_| {
                YummyError::Avatar(format!("{} is not a supported image", path.display()))
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "avatar".to_string());

        tracing::debug!(file = %file_name, mime = format.to_mime_type(), size = bytes.len(), "Staged avatar");
        Ok(Self::new(file_name, format.to_mime_type(), Bytes::from(bytes)))
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an empty file.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Tracks which local previews are alive
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashSet<Uuid>>,
}

impl PreviewRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a preview reference for a staged file.
    pub fn create(self: &Arc<Self>, file: &StagedFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        if let Ok(mut live) = self.live.lock() {
            live.insert(id);
        }
        tracing::debug!(%id, file = %file.file_name, "Created avatar preview");
        PreviewHandle {
            id,
            url: format!("blob:yummy/{}", id),
            file_name: file.file_name.clone(),
            registry: Arc::clone(self),
        }
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    fn revoke(&self, id: Uuid) {
        if let Ok(mut live) = self.live.lock() {
            if live.remove(&id) {
                tracing::debug!(%id, "Revoked avatar preview");
            }
        }
    }
}

/// Live local preview of a staged file; revoked on drop
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    file_name: String,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    /// Opaque preview URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Name of the previewed file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}

/// What the avatar slot currently shows
#[derive(Debug, Default)]
pub enum AvatarRef {
    /// Empty-avatar icon
    #[default]
    None,
    /// Image served by the backend
    Remote(String),
    /// Local preview of a staged file
    Preview(PreviewHandle),
}

impl AvatarRef {
    /// Maps a backend image reference, treating the sentinel as no avatar.
    pub fn from_server(image: Option<&str>, sentinel: &str) -> Self {
        match image {
            Some(image) if !image.is_empty() && !is_default_image(image, sentinel) => {
                AvatarRef::Remote(image.to_string())
            }
            _ => AvatarRef::None,
        }
    }

    /// URL to display, if any.
    pub fn display_url(&self) -> Option<&str> {
        match self {
            AvatarRef::None => None,
            AvatarRef::Remote(url) => Some(url),
            AvatarRef::Preview(handle) => Some(handle.url()),
        }
    }

    /// Returns `true` when the empty-avatar icon is shown.
    pub fn is_none(&self) -> bool {
        matches!(self, AvatarRef::None)
    }
}
