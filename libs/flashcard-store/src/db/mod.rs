//! Local SQLite database operations.

pub mod error;
pub mod migrations;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use migrations::UpgradePolicy;
pub use repository::{CategoryRepository, DeckRepository, FlashcardRepository, FlashcardStore};
