//! Process-lifetime cache of the symmetric key.

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::SecretStore;

/// Length of the raw symmetric key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// A raw 256-bit key. Never persisted, never logged, never rotated.
pub type SymmetricKey = [u8; KEY_LENGTH];

fn is_hex_key(raw: &str) -> bool {
    raw.len() == KEY_LENGTH * 2
        && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Lazily initialized, explicitly owned key cache.
///
/// The key is fetched from the [`SecretStore`] once on the first crypto
/// operation and then shared read-only for the process lifetime. Owned by
/// whoever needs crypto (no implicit global); [`reset`](Self::reset) exists
/// for test isolation.
#[derive(Default)]
pub struct KeyCache {
    key: RwLock<Option<SymmetricKey>>,
}

impl KeyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached key, fetching and validating it on first use.
    ///
    /// The store must return exactly 64 lowercase hex characters; anything
    /// else is surfaced verbatim as [`CoreError::KeyUnavailable`] — secret
    /// stores report their own failures through the returned text.
    pub async fn get(&self, store: &dyn SecretStore) -> CoreResult<SymmetricKey> {
        {
            let cached = self.key.read().await;
            if let Some(key) = *cached {
                return Ok(key);
            }
        }

        let mut cached = self.key.write().await;
        if let Some(key) = *cached {
            return Ok(key);
        }

        let raw = store.fetch_key().await?;
        if !is_hex_key(&raw) {
            return Err(CoreError::KeyUnavailable(raw));
        }

        let mut key = [0u8; KEY_LENGTH];
        hex::decode_to_slice(&raw, &mut key)
            .map_err(|e| CoreError::KeyUnavailable(e.to_string()))?;

        *cached = Some(key);
        log::debug!("symmetric key cached for process lifetime");
        Ok(key)
    }

    /// Drops the cached key so the next [`get`](Self::get) refetches.
    pub async fn reset(&self) {
        *self.key.write().await = None;
    }
}
