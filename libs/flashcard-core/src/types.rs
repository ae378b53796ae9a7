//! Core types for flashcard application.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Row identifier assigned by the database on insert.
pub type RowId = i64;

/// Reject text that is empty or only whitespace.
///
/// The value itself is never trimmed; callers store it verbatim.
pub fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RowId,
    pub title: String,
}

/// A stored deck, owned by a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: RowId,
    pub title: String,
    /// Owning category id. `None` only for rows written without a parent.
    pub belongs_to: Option<RowId>,
}

/// A stored flashcard, owned by a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCard {
    pub id: RowId,
    pub title: String,
    pub content: String,
    pub answer: String,
    pub belongs_to: Option<RowId>,
}

/// Category to be inserted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub title: String,
}

impl NewCategory {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)
    }
}

/// Deck to be inserted under an existing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeck {
    pub title: String,
    pub category_id: RowId,
}

impl NewDeck {
    pub fn new(title: impl Into<String>, category_id: RowId) -> Self {
        Self {
            title: title.into(),
            category_id,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)
    }
}

/// Flashcard to be inserted under an existing deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashCard {
    pub title: String,
    pub content: String,
    pub answer: String,
    pub deck_id: RowId,
}

impl NewFlashCard {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        answer: impl Into<String>,
        deck_id: RowId,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            answer: answer.into(),
            deck_id,
        }
    }

    /// Check every required text field, reporting the first empty one.
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        require_text("answer", &self.answer)
    }
}
