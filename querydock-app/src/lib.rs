//! Platform-agnostic application bootstrap for QueryDock.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection), plus the desktop storage adapters.

use std::sync::Arc;

use querydock_core::error::{CoreError, CoreResult};
use querydock_core::services::FavoritesStore;
use querydock_core::traits::{ProfileFile, SecretStore};

pub mod adapters;

pub use adapters::FsProfileFile;
#[cfg(feature = "keyring-store")]
pub use adapters::KeyringSecretStore;

/// Platform-agnostic application state.
///
/// Holds the favorites store. Every frontend constructs this once at
/// startup via `AppStateBuilder`.
pub struct AppState {
    /// Favorites store (encrypted connection profiles)
    pub favorites: Arc<FavoritesStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Run the startup sequence.
    ///
    /// Loads the favorites file once so a legacy plaintext list is upgraded
    /// to encrypted storage before the app serves requests. A failure here
    /// is logged but not fatal; the error resurfaces on the next access.
    pub async fn run_startup(&self) {
        match self.favorites.load().await {
            Ok(profiles) => {
                log::info!("loaded {} connection profiles at startup", profiles.len());
            }
            Err(e) => {
                log::error!("failed to load connection profiles at startup: {e}");
            }
        }
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `profile_file` — where the favorites file lives
/// - `secret_store` — where the encryption key lives
pub struct AppStateBuilder {
    profile_file: Option<Arc<dyn ProfileFile>>,
    secret_store: Option<Arc<dyn SecretStore>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile_file: None,
            secret_store: None,
        }
    }

    #[must_use]
    pub fn profile_file(mut self, file: Arc<dyn ProfileFile>) -> Self {
        self.profile_file = Some(file);
        self
    }

    #[must_use]
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let profile_file = self
            .profile_file
            .ok_or_else(|| CoreError::Validation("profile_file is required".to_string()))?;
        let secret_store = self
            .secret_store
            .ok_or_else(|| CoreError::Validation("secret_store is required".to_string()))?;

        Ok(AppState {
            favorites: Arc::new(FavoritesStore::new(profile_file, secret_store)),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querydock_core::test_utils::{MemoryProfileFile, MockSecretStore, TEST_KEY_HEX};

    #[tokio::test]
    async fn build_requires_both_adapters() {
        let err = AppStateBuilder::new().build().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = AppStateBuilder::new()
            .profile_file(Arc::new(MemoryProfileFile::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn built_state_serves_favorites() {
        let state = AppStateBuilder::new()
            .profile_file(Arc::new(MemoryProfileFile::new()))
            .secret_store(Arc::new(MockSecretStore::with_key(TEST_KEY_HEX)))
            .build()
            .unwrap();

        state.run_startup().await;
        assert!(state.favorites.load().await.unwrap().is_empty());
    }
}
