//! Profile cache: local mirror of the last fetched profile with broadcast
//! to subscribers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::profile::BackendProfile;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Events emitted when the cached profile changes or a refresh fails.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Updated { profile: Box<BackendProfile> },
    RefreshFailed { message: String },
}

/// In-memory optimistic copy of the backend profile.
pub struct ProfileCache {
    profile: RwLock<Option<BackendProfile>>,
    path: Option<PathBuf>,
    tx: broadcast::Sender<CacheEvent>,
}

impl ProfileCache {
    pub fn new() -> Arc<Self> {
        Self::build(None, None)
    }

    /// File-backed cache. Loads the mirrored profile if the file exists;
    /// an unreadable mirror is discarded with a warning.
    pub async fn with_file(path: impl AsRef<Path>) -> Arc<Self> {
        let path = path.as_ref().to_path_buf();
        let initial = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BackendProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable profile cache");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read profile cache");
                None
            }
        };
        Self::build(initial, Some(path))
    }

    fn build(initial: Option<BackendProfile>, path: Option<PathBuf>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            profile: RwLock::new(initial),
            path,
            tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }

    pub async fn get(&self) -> Option<BackendProfile> {
        self.profile.read().await.clone()
    }

    /// Replace the cached profile. Later writes win unconditionally.
    ///
    /// The disk mirror is written under the same lock, so it never lags
    /// the in-memory copy.
    pub async fn store(&self, profile: BackendProfile) {
        {
            let mut guard = self.profile.write().await;
            if let Err(e) = self.persist(&profile).await {
                warn!(error = %e, "Failed to mirror profile to disk");
            }
            *guard = Some(profile.clone());
        }
        debug!("Profile cache updated");
        // Ok if nobody is listening
        let _ = self.tx.send(CacheEvent::Updated {
            profile: Box::new(profile),
        });
    }

    /// Broadcast a refresh failure without touching the cached value.
    pub fn report_failure(&self, message: impl Into<String>) {
        let _ = self.tx.send(CacheEvent::RefreshFailed {
            message: message.into(),
        });
    }

    /// Drop the cached profile and delete its disk mirror.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.profile.write().await;
        *guard = None;
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Removed profile cache"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn persist(&self, profile: &BackendProfile) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(profile)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> BackendProfile {
        BackendProfile {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn store_and_get() {
        let cache = ProfileCache::new();
        assert!(cache.get().await.is_none());
        cache.store(profile("Jane")).await;
        assert_eq!(cache.get().await.unwrap().name, "Jane");
        cache.store(profile("Jane Doe")).await;
        assert_eq!(cache.get().await.unwrap().name, "Jane Doe");
    }

    #[tokio::test]
    async fn subscribers_see_updates_and_failures() {
        let cache = ProfileCache::new();
        let mut rx = cache.subscribe();

        cache.store(profile("Jane")).await;
        match rx.recv().await.unwrap() {
            CacheEvent::Updated { profile } => assert_eq!(profile.name, "Jane"),
            other => panic!("unexpected event: {other:?}"),
        }

        cache.report_failure("offline");
        assert_eq!(
            rx.recv().await.unwrap(),
            CacheEvent::RefreshFailed {
                message: "offline".into()
            }
        );
        assert_eq!(cache.get().await.unwrap().name, "Jane");
    }

    #[tokio::test]
    async fn file_mirror_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("profile.json");

        let cache = ProfileCache::with_file(&path).await;
        assert!(cache.get().await.is_none());
        cache.store(profile("Jane")).await;

        let reloaded = ProfileCache::with_file(&path).await;
        assert_eq!(reloaded.get().await.unwrap().name, "Jane");

        reloaded.clear().await.unwrap();
        assert!(reloaded.get().await.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn overlapping_stores_leave_mirror_matching_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let cache = ProfileCache::with_file(&path).await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.store(profile(&format!("v{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let in_memory = cache.get().await.unwrap().name;
        let on_disk = ProfileCache::with_file(&path).await.get().await.unwrap().name;
        assert_eq!(in_memory, on_disk);
    }

    #[tokio::test]
    async fn clearing_memory_only_cache_is_ok() {
        let cache = ProfileCache::new();
        cache.store(profile("Jane")).await;
        cache.clear().await.unwrap();
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_mirror_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cache = ProfileCache::with_file(&path).await;
        assert!(cache.get().await.is_none());
    }
}
