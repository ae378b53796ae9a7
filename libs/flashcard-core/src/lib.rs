//! Core flashcard library shared by the storage layer and its callers.
//!
//! Provides:
//! - Domain types (Category, Deck, FlashCard)
//! - Insert carriers (NewCategory, NewDeck, NewFlashCard) with validation

pub mod error;
pub mod types;

pub use error::{Result, ValidationError};
pub use types::{
    require_text, Category, Deck, FlashCard, NewCategory, NewDeck, NewFlashCard, RowId,
};
