//! Abstraction traits for platform collaborators.

mod profile_file;
mod secret_store;

pub use profile_file::ProfileFile;
pub use secret_store::SecretStore;
