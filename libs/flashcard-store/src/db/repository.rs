//! Repository pattern for database access.

use std::io;
use std::path::Path;

use flashcard_core::{
    require_text, Category, Deck, FlashCard, NewCategory, NewDeck, NewFlashCard, RowId,
};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::db::error::StoreError;
use crate::db::migrations;
use crate::db::schema::{CATEGORIES_TABLE, DECKS_TABLE, FLASHCARDS_TABLE};

type Result<T> = std::result::Result<T, StoreError>;

/// Repository for category operations.
pub trait CategoryRepository {
    fn create_category(&self, title: &str) -> Result<RowId>;
    fn insert_category(&self, category: &NewCategory) -> Result<RowId>;
    fn get_category(&self, id: RowId) -> Result<Option<Category>>;
    fn list_categories(&self) -> Result<Vec<Category>>;
}

/// Repository for deck operations.
pub trait DeckRepository {
    fn create_deck(&self, title: &str, category_id: RowId) -> Result<RowId>;
    fn insert_deck(&self, deck: &NewDeck) -> Result<RowId>;
    fn get_deck(&self, id: RowId) -> Result<Option<Deck>>;
    fn list_decks(&self, category_id: RowId) -> Result<Vec<Deck>>;
}

/// Repository for flashcard operations.
pub trait FlashcardRepository {
    fn create_flashcard(
        &self,
        title: &str,
        content: &str,
        answer: &str,
        deck_id: RowId,
    ) -> Result<RowId>;
    fn insert_flashcard(&self, card: &NewFlashCard) -> Result<RowId>;
    fn get_flashcard(&self, id: RowId) -> Result<Option<FlashCard>>;
    fn list_flashcards(&self, deck_id: RowId) -> Result<Vec<FlashCard>>;
}

/// SQLite-backed flashcard store. Owns the single writable connection.
pub struct FlashcardStore {
    conn: Connection,
}

impl FlashcardStore {
    /// Open the database file named by `config`, creating it and its parent
    /// directory if necessary, then bring the schema up to date.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.database_path.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| open_error(path, e))?;
        }

        let conn = Connection::open(path).map_err(|e| open_error(path, e))?;
        // SQLite falls back to a read-only handle when the file is not writable.
        if conn
            .is_readonly(DatabaseName::Main)
            .map_err(|e| open_error(path, e))?
        {
            return Err(open_error(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "database is read-only"),
            ));
        }
        let store = Self::initialize(conn, config)?;
        info!(path = %path.display(), "flashcard store opened");
        Ok(store)
    }

    /// Open in-memory database (for testing). `database_path` is ignored.
    pub fn open_in_memory(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, config)
    }

    fn initialize(mut conn: Connection, config: &StoreConfig) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", config.enforce_foreign_keys)?;
        let found = migrations::upgrade(&mut conn, config.upgrade_policy)?;
        if found == 0 {
            info!("created flashcard schema");
        }
        Ok(Self { conn })
    }

    /// Stored schema version.
    pub fn schema_version(&self) -> Result<u32> {
        migrations::user_version(&self.conn)
    }

    /// Re-run schema creation. Existing tables and rows are left intact.
    pub fn create_schema(&self) -> Result<()> {
        migrations::create_schema(&self.conn)
    }

    /// Run the upgrade path regardless of the stored version.
    pub fn force_upgrade(&mut self, policy: migrations::UpgradePolicy) -> Result<()> {
        match policy {
            migrations::UpgradePolicy::Migrate => {
                let from = migrations::user_version(&self.conn)?;
                migrations::migrate(&mut self.conn, from)
            }
            migrations::UpgradePolicy::Recreate => migrations::recreate(&mut self.conn),
        }
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            title: row.get(1)?,
        })
    }

    fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
        Ok(Deck {
            id: row.get(0)?,
            title: row.get(1)?,
            belongs_to: row.get(2)?,
        })
    }

    fn row_to_flashcard(row: &rusqlite::Row) -> rusqlite::Result<FlashCard> {
        Ok(FlashCard {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            answer: row.get(3)?,
            belongs_to: row.get(4)?,
        })
    }
}

fn open_error(path: &Path, err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
    StoreError::Open {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

impl CategoryRepository for FlashcardStore {
    fn create_category(&self, title: &str) -> Result<RowId> {
        require_text("title", title).map_err(|e| StoreError::invalid(CATEGORIES_TABLE, e))?;

        self.conn
            .execute("INSERT INTO categories (title) VALUES (?1)", params![title])
            .map_err(|e| StoreError::from_insert(CATEGORIES_TABLE, None, e))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = CATEGORIES_TABLE, id, "inserted row");
        Ok(id)
    }

    fn insert_category(&self, category: &NewCategory) -> Result<RowId> {
        self.create_category(&category.title)
    }

    fn get_category(&self, id: RowId) -> Result<Option<Category>> {
        self.conn
            .query_row(
                "SELECT id, title FROM categories WHERE id = ?1",
                params![id],
                Self::row_to_category,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

impl DeckRepository for FlashcardStore {
    fn create_deck(&self, title: &str, category_id: RowId) -> Result<RowId> {
        require_text("title", title).map_err(|e| StoreError::invalid(DECKS_TABLE, e))?;

        self.conn
            .execute(
                "INSERT INTO decks (title, belongs_to) VALUES (?1, ?2)",
                params![title, category_id],
            )
            .map_err(|e| StoreError::from_insert(DECKS_TABLE, Some(category_id), e))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = DECKS_TABLE, id, category_id, "inserted row");
        Ok(id)
    }

    fn insert_deck(&self, deck: &NewDeck) -> Result<RowId> {
        self.create_deck(&deck.title, deck.category_id)
    }

    fn get_deck(&self, id: RowId) -> Result<Option<Deck>> {
        self.conn
            .query_row(
                "SELECT id, title, belongs_to FROM decks WHERE id = ?1",
                params![id],
                Self::row_to_deck,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_decks(&self, category_id: RowId) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, belongs_to FROM decks WHERE belongs_to = ?1 ORDER BY id",
        )?;
        let decks = stmt
            .query_map(params![category_id], Self::row_to_deck)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(decks)
    }
}

impl FlashcardRepository for FlashcardStore {
    fn create_flashcard(
        &self,
        title: &str,
        content: &str,
        answer: &str,
        deck_id: RowId,
    ) -> Result<RowId> {
        let card = NewFlashCard::new(title, content, answer, deck_id);
        self.insert_flashcard(&card)
    }

    fn insert_flashcard(&self, card: &NewFlashCard) -> Result<RowId> {
        card.validate()
            .map_err(|e| StoreError::invalid(FLASHCARDS_TABLE, e))?;

        self.conn
            .execute(
                "INSERT INTO flashcards (title, content, answer, belongs_to) VALUES (?1, ?2, ?3, ?4)",
                params![card.title, card.content, card.answer, card.deck_id],
            )
            .map_err(|e| StoreError::from_insert(FLASHCARDS_TABLE, Some(card.deck_id), e))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = FLASHCARDS_TABLE, id, deck_id = card.deck_id, "inserted row");
        Ok(id)
    }

    fn get_flashcard(&self, id: RowId) -> Result<Option<FlashCard>> {
        self.conn
            .query_row(
                "SELECT id, title, content, answer, belongs_to FROM flashcards WHERE id = ?1",
                params![id],
                Self::row_to_flashcard,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_flashcards(&self, deck_id: RowId) -> Result<Vec<FlashCard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, answer, belongs_to FROM flashcards WHERE belongs_to = ?1 ORDER BY id",
        )?;
        let cards = stmt
            .query_map(params![deck_id], Self::row_to_flashcard)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cards)
    }
}
