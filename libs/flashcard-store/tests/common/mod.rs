//! Shared helpers for store integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use flashcard_store::{FlashcardStore, StoreConfig};
use tempfile::TempDir;

/// Temporary directory holding one database file. The directory is removed
/// when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        flashcard_store::logging::init("flashcard_store=debug");
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join(flashcard_store::DATABASE_NAME)
    }

    pub fn config(&self) -> StoreConfig {
        StoreConfig::at(self.db_path())
    }

    pub fn open(&self) -> FlashcardStore {
        FlashcardStore::open(&self.config()).expect("Failed to open store")
    }

    /// Count rows with a raw connection, bypassing the store.
    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open raw connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("Failed to count rows")
    }
}

/// In-memory store with default settings.
pub fn memory_store() -> FlashcardStore {
    flashcard_store::logging::init("flashcard_store=debug");
    FlashcardStore::open_in_memory(&StoreConfig::default()).expect("Failed to open store")
}

/// In-memory store that accepts dangling parent ids.
pub fn lenient_store() -> FlashcardStore {
    let config = StoreConfig::default().with_foreign_keys(false);
    FlashcardStore::open_in_memory(&config).expect("Failed to open store")
}
