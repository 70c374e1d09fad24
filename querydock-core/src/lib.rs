//! QueryDock Core Library
//!
//! Provides the platform-independent heart of the database client:
//! - Encrypted persistence of connection profiles (Favorites Store)
//! - Authenticated encryption primitives for the favorites file
//! - Symmetric key caching
//!
//! Storage and key retrieval are abstracted through traits so the same
//! logic runs under the desktop shell and in tests.

pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;

pub mod test_utils;

// Re-export common types
pub use crypto::{is_encrypted, KeyCache, SymmetricKey, KEY_LENGTH};
pub use error::{CoreError, CoreResult};
pub use services::FavoritesStore;
pub use traits::{ProfileFile, SecretStore};

// The driver layer travels with the core.
pub use querydock_driver as driver;
pub use querydock_driver::{ConnectionProfile, Connector, DriverError};
