//! Local storage for categories, decks and flashcards.
//!
//! A [`FlashcardStore`] owns one SQLite connection to `flashcards.db`,
//! keeps its schema at [`SCHEMA_VERSION`] and inserts rows for each entity.

pub mod config;
pub mod db;
pub mod logging;
pub mod state;

pub use config::StoreConfig;
pub use db::schema::{DATABASE_NAME, SCHEMA_VERSION};
pub use db::{
    CategoryRepository, DeckRepository, FlashcardRepository, FlashcardStore, StoreError,
    UpgradePolicy,
};
pub use state::AppState;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;
