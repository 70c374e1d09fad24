//! Core services.

mod favorites;

pub use favorites::FavoritesStore;
