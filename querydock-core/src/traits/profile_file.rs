//! Profile file abstraction trait.

use async_trait::async_trait;

use crate::error::CoreResult;

/// Whole-file text storage for the favorites list, rooted in an
/// application-private data directory (canonically `data/favorites.json`).
///
/// Platform implementations:
/// - Desktop: `FsProfileFile` (`querydock-app`)
/// - Tests: `MemoryProfileFile` (`test_utils`)
#[async_trait]
pub trait ProfileFile: Send + Sync {
    /// Whether a persisted file exists yet.
    async fn exists(&self) -> CoreResult<bool>;

    /// Reads the entire file as UTF-8 text.
    async fn read(&self) -> CoreResult<String>;

    /// Overwrites the entire file in one write, creating parent
    /// directories as needed.
    async fn write(&self, contents: &str) -> CoreResult<()>;
}
