//! Secret store abstraction trait.

use async_trait::async_trait;

use crate::error::CoreResult;

/// An opaque source of the symmetric key.
///
/// Platform implementations:
/// - Desktop: `KeyringSecretStore` (system keychain, `querydock-app`)
/// - Tests: `MockSecretStore` (`test_utils`)
///
/// The store's cryptography is its own business; this core only consumes
/// the key. Errors propagate verbatim.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches the key as a 64-character lowercase hex string (256 bits).
    async fn fetch_key(&self) -> CoreResult<String>;
}
