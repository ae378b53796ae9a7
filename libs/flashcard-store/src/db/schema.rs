//! SQLite schema definitions.

/// File name of the on-disk database.
pub const DATABASE_NAME: &str = "flashcards.db";

/// Schema version this build expects, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

pub const CATEGORIES_TABLE: &str = "categories";
pub const DECKS_TABLE: &str = "decks";
pub const FLASHCARDS_TABLE: &str = "flashcards";

/// Complete schema for the local database.
pub const SCHEMA: &str = r#"
-- Categories group decks
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL
);

-- Decks belong to a category
CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    belongs_to INTEGER REFERENCES categories(id)
);

-- Flashcards belong to a deck
CREATE TABLE IF NOT EXISTS flashcards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    answer TEXT NOT NULL,
    belongs_to INTEGER REFERENCES decks(id)
);
"#;

/// Drop every table, children first so foreign keys never block the drop.
pub const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS flashcards;
DROP TABLE IF EXISTS decks;
DROP TABLE IF EXISTS categories;
"#;

/// Columns that must hold text, by name as reported in NOT NULL failures.
pub const REQUIRED_COLUMNS: &[&str] = &["title", "content", "answer"];

/// Rebuild a `decks` table that predates the foreign key, keeping its rows
/// and ids.
pub const REBUILD_DECKS: &str = r#"
CREATE TABLE decks_rebuild (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    belongs_to INTEGER REFERENCES categories(id)
);
INSERT INTO decks_rebuild (id, title, belongs_to)
    SELECT id, title, belongs_to FROM decks;
DROP TABLE decks;
ALTER TABLE decks_rebuild RENAME TO decks;
"#;

/// Rebuild a `flashcards` table that predates the foreign key.
pub const REBUILD_FLASHCARDS: &str = r#"
CREATE TABLE flashcards_rebuild (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    answer TEXT NOT NULL,
    belongs_to INTEGER REFERENCES decks(id)
);
INSERT INTO flashcards_rebuild (id, title, content, answer, belongs_to)
    SELECT id, title, content, answer, belongs_to FROM flashcards;
DROP TABLE flashcards;
ALTER TABLE flashcards_rebuild RENAME TO flashcards;
"#;
