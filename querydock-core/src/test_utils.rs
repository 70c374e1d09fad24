//! Shared test doubles for core services.
//!
//! Production adapters live in `querydock-app`; tests swap in these
//! in-memory stand-ins so core logic runs without a filesystem or keychain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::FavoritesStore;
use crate::traits::{ProfileFile, SecretStore};

/// A fixed 256-bit key (64 lowercase hex chars) for tests.
pub const TEST_KEY_HEX: &str = "a52b3a1bfe95509b7dd2458bd0f21ec2c41f207370b9bbb7a5ab41bca1bbf3a2";

/// In-memory [`SecretStore`] returning a canned key or a canned failure,
/// counting fetches so cache behavior is observable.
pub struct MockSecretStore {
    outcome: Result<String, String>,
    fetch_count: AtomicUsize,
}

impl MockSecretStore {
    #[must_use]
    pub fn with_key(key: &str) -> Self {
        Self {
            outcome: Ok(key.to_string()),
            fetch_count: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// How many times `fetch_key` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn fetch_key(&self) -> CoreResult<String> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map_err(CoreError::KeyUnavailable)
    }
}

/// In-memory [`ProfileFile`]; `None` contents model a file that does not
/// exist yet.
#[derive(Default)]
pub struct MemoryProfileFile {
    contents: RwLock<Option<String>>,
    write_count: AtomicUsize,
}

impl MemoryProfileFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored contents, bypassing the write counter.
    pub async fn seed(&self, contents: &str) {
        *self.contents.write().await = Some(contents.to_string());
    }

    /// The raw stored text, if any.
    pub async fn raw(&self) -> Option<String> {
        self.contents.read().await.clone()
    }

    /// How many times `write` has been called.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFile for MemoryProfileFile {
    async fn exists(&self) -> CoreResult<bool> {
        Ok(self.contents.read().await.is_some())
    }

    async fn read(&self) -> CoreResult<String> {
        self.contents
            .read()
            .await
            .clone()
            .ok_or_else(|| CoreError::Storage("favorites file does not exist".to_string()))
    }

    async fn write(&self, contents: &str) -> CoreResult<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        *self.contents.write().await = Some(contents.to_string());
        Ok(())
    }
}

/// A [`FavoritesStore`] wired to fresh in-memory collaborators and the
/// canned test key. Returns the file handle too so tests can inspect the
/// raw persisted text.
#[must_use]
pub fn create_test_store() -> (FavoritesStore, Arc<MemoryProfileFile>) {
    let file = Arc::new(MemoryProfileFile::new());
    let secrets = Arc::new(MockSecretStore::with_key(TEST_KEY_HEX));
    (FavoritesStore::new(file.clone(), secrets), file)
}
