//! Keyring-based secret store.
//!
//! Holds the favorites encryption key in the system keychain (macOS
//! Keychain, Windows Credential Manager, Linux Secret Service) via the
//! `keyring` crate.

use async_trait::async_trait;
use keyring::Entry;
use rand::RngCore;

use querydock_core::crypto::KEY_LENGTH;
use querydock_core::error::{CoreError, CoreResult};
use querydock_core::traits::SecretStore;

const SERVICE_NAME: &str = "querydock";
const KEY_NAME: &str = "favorites-key";

/// Keyring-based secret store.
///
/// Generates a fresh random 256-bit key on first use and stores it as
/// lowercase hex under one keychain entry. Keychain failures surface
/// verbatim so the UI can show the platform's own message.
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn get_entry() -> CoreResult<Entry> {
        Entry::new(SERVICE_NAME, KEY_NAME)
            .map_err(|e| CoreError::KeyUnavailable(e.to_string()))
    }

    fn fetch_or_create_sync() -> CoreResult<String> {
        let entry = Self::get_entry()?;
        match entry.get_password() {
            Ok(key) => Ok(key),
            Err(keyring::Error::NoEntry) => {
                let mut raw = [0u8; KEY_LENGTH];
                rand::rng().fill_bytes(&mut raw);
                let key = hex::encode(raw);
                entry
                    .set_password(&key)
                    .map_err(|e| CoreError::KeyUnavailable(e.to_string()))?;
                log::info!("generated a new favorites encryption key in the keychain");
                Ok(key)
            }
            Err(e) => Err(CoreError::KeyUnavailable(e.to_string())),
        }
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn fetch_key(&self) -> CoreResult<String> {
        tokio::task::spawn_blocking(Self::fetch_or_create_sync)
            .await
            .map_err(|e| CoreError::KeyUnavailable(format!("Task join error: {e}")))?
    }
}
