use crate::models::RawFile;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Platform seam for revocable preview references (object URLs and the like)
pub trait PreviewBackend: Send + Sync {
    /// Create a reference that renders `bytes` without re-reading the file
    fn create(&self, bytes: &Bytes, mime_type: &str) -> String;

    /// Revoke a reference previously returned by `create`
    fn revoke(&self, url: &str);
}

/// Revocable preview reference owned by exactly one image entry.
///
/// Revocation happens once: either through [`PreviewManager::release`], which
/// consumes the handle, or on drop.
pub struct PreviewHandle {
    url: String,
    backend: Arc<dyn PreviewBackend>,
    released: bool,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    fn revoke(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.backend.revoke(&self.url);
        tracing::debug!("Revoked preview {}", self.url);
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("url", &self.url)
            .field("released", &self.released)
            .finish()
    }
}

/// Acquires preview handles for image files and releases them.
///
/// Handles are not tracked here; whoever holds one owns the release.
#[derive(Clone)]
pub struct PreviewManager {
    backend: Arc<dyn PreviewBackend>,
}

impl PreviewManager {
    pub fn new(backend: Arc<dyn PreviewBackend>) -> Self {
        Self { backend }
    }

    /// Returns a handle for `image/*` files and `None` for everything else
    pub fn acquire(&self, file: &RawFile) -> Option<PreviewHandle> {
        if !file.is_image() {
            return None;
        }

        let url = self.backend.create(&file.bytes, &file.essence());
        tracing::debug!("Acquired preview {} for {}", url, file.name);

        Some(PreviewHandle {
            url,
            backend: Arc::clone(&self.backend),
            released: false,
        })
    }

    pub fn release(&self, mut handle: PreviewHandle) {
        handle.revoke();
    }
}

impl fmt::Debug for PreviewManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewManager").finish_non_exhaustive()
    }
}

/// In-memory `blob:` URL table. Keeps the bytes alive until revoked.
#[derive(Debug, Default)]
pub struct BlobUrlBackend {
    urls: Mutex<HashMap<String, Bytes>>,
    created: AtomicUsize,
    revoked: AtomicUsize,
    stale_revocations: AtomicUsize,
}

impl BlobUrlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a live URL to its content
    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    pub fn live(&self) -> usize {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn revoked(&self) -> usize {
        self.revoked.load(Ordering::SeqCst)
    }

    /// Revocations of URLs that were unknown or already revoked
    pub fn stale_revocations(&self) -> usize {
        self.stale_revocations.load(Ordering::SeqCst)
    }
}

impl PreviewBackend for BlobUrlBackend {
    fn create(&self, bytes: &Bytes, _mime_type: &str) -> String {
        let url = format!("blob:file-intake/{}", Uuid::new_v4());
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone(), bytes.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        url
    }

    fn revoke(&self, url: &str) {
        let removed = self
            .urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);

        if removed.is_some() {
            self.revoked.fetch_add(1, Ordering::SeqCst);
        } else {
            self.stale_revocations.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("Revoke of unknown preview url {}", url);
        }
    }
}

/// Backend for headless use where nothing is rendered
pub struct NoOpPreviewBackend;

impl PreviewBackend for NoOpPreviewBackend {
    fn create(&self, _bytes: &Bytes, _mime_type: &str) -> String {
        format!("noop:{}", Uuid::new_v4())
    }

    fn revoke(&self, _url: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (Arc<BlobUrlBackend>, PreviewManager) {
        let backend = Arc::new(BlobUrlBackend::new());
        let manager = PreviewManager::new(backend.clone());
        (backend, manager)
    }

    #[test]
    fn test_acquire_only_for_images() {
        let (backend, manager) = manager();

        let pdf = RawFile::from_bytes("a.pdf", "application/pdf", "%PDF");
        assert!(manager.acquire(&pdf).is_none());
        assert_eq!(backend.created(), 0);

        let png = RawFile::from_bytes("a.png", "image/png", vec![1u8, 2, 3]);
        let handle = manager.acquire(&png).unwrap();
        assert!(handle.url().starts_with("blob:"));
        assert_eq!(backend.get(handle.url()).unwrap(), Bytes::from(vec![1u8, 2, 3]));
        assert_eq!(backend.live(), 1);

        manager.release(handle);
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn test_release_is_exactly_once() {
        let (backend, manager) = manager();
        let png = RawFile::from_bytes("a.png", "image/png", vec![0u8]);

        // explicit release, then the consumed handle's drop must not revoke again
        let handle = manager.acquire(&png).unwrap();
        manager.release(handle);

        // dropped without explicit release
        let handle = manager.acquire(&png).unwrap();
        drop(handle);

        assert_eq!(backend.created(), 2);
        assert_eq!(backend.revoked(), 2);
        assert_eq!(backend.stale_revocations(), 0);
    }

    #[test]
    fn test_noop_backend() {
        let manager = PreviewManager::new(Arc::new(NoOpPreviewBackend));
        let handle = manager
            .acquire(&RawFile::declared("a.gif", 1, "image/gif"))
            .unwrap();
        assert!(handle.url().starts_with("noop:"));
    }
}
