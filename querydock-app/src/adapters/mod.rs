//! Platform storage adapters for the desktop shell.

mod fs_profile_file;

pub use fs_profile_file::FsProfileFile;

#[cfg(feature = "keyring-store")]
mod keyring_secret_store;

#[cfg(feature = "keyring-store")]
pub use keyring_secret_store::KeyringSecretStore;
