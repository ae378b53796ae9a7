//! Schema creation, reopen and upgrade behavior against real files.

mod common;

use common::TestContext;
use flashcard_store::{
    CategoryRepository, DeckRepository, FlashcardRepository, FlashcardStore, StoreConfig,
    StoreError, UpgradePolicy, SCHEMA_VERSION,
};
use pretty_assertions::assert_eq;

/// Write a version-0 database that already has tables and rows, as left by
/// a build that never stamped a schema version.
fn seed_unversioned(ctx: &TestContext) {
    std::fs::create_dir_all(ctx.db_path().parent().unwrap()).unwrap();
    let conn = rusqlite::Connection::open(ctx.db_path()).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL);
         CREATE TABLE decks (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL, belongs_to INTEGER);
         CREATE TABLE flashcards (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL,
             content TEXT NOT NULL, answer TEXT NOT NULL, belongs_to INTEGER);
         INSERT INTO categories (title) VALUES ('Science');
         INSERT INTO decks (title, belongs_to) VALUES ('Biology', 1);
         INSERT INTO flashcards (title, content, answer, belongs_to)
             VALUES ('Cell', 'What is a cell?', 'Basic unit of life', 1);",
    )
    .unwrap();
}

#[test]
fn open_creates_file_and_stamps_version() {
    let ctx = TestContext::new();
    assert!(!ctx.db_path().exists());

    let store = ctx.open();
    assert!(ctx.db_path().exists());
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn rows_survive_reopen() {
    let ctx = TestContext::new();
    {
        let store = ctx.open();
        let category = store.create_category("Science").unwrap();
        store.create_deck("Biology", category).unwrap();
    }

    let store = ctx.open();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(store.get_category(1).unwrap().unwrap().title, "Science");
    assert_eq!(store.list_decks(1).unwrap().len(), 1);
    assert_eq!(store.create_category("History").unwrap(), 2);
}

#[test]
fn create_schema_twice_keeps_rows() {
    let store = common::memory_store();
    store.create_category("Science").unwrap();

    store.create_schema().unwrap();
    store.create_schema().unwrap();

    assert_eq!(store.list_categories().unwrap().len(), 1);
}

#[test]
fn recreate_upgrade_from_version_zero_discards_rows() {
    let ctx = TestContext::new();
    seed_unversioned(&ctx);
    assert_eq!(ctx.count_rows("flashcards"), 1);

    let config = ctx.config().with_upgrade_policy(UpgradePolicy::Recreate);
    let store = FlashcardStore::open(&config).unwrap();

    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert!(store.list_categories().unwrap().is_empty());
    assert_eq!(store.get_deck(1).unwrap(), None);
    assert_eq!(store.get_flashcard(1).unwrap(), None);
    assert_eq!(store.create_category("Fresh").unwrap(), 1);
}

#[test]
fn migrate_upgrade_from_version_zero_keeps_rows() {
    let ctx = TestContext::new();
    seed_unversioned(&ctx);

    let store = ctx.open();

    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(store.get_category(1).unwrap().unwrap().title, "Science");
    assert_eq!(store.list_flashcards(1).unwrap()[0].answer, "Basic unit of life");
}

#[test]
fn migrate_upgrade_from_version_zero_adds_foreign_keys() {
    let ctx = TestContext::new();
    seed_unversioned(&ctx);

    let store = ctx.open();

    let err = store.create_deck("Orphan", 999).unwrap_err();
    assert!(matches!(err, StoreError::UnknownParent { table: "decks", id: 999 }));
    let err = store.create_flashcard("Q", "What?", "That.", 999).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnknownParent { table: "flashcards", id: 999 }
    ));

    assert_eq!(store.get_deck(1).unwrap().unwrap().belongs_to, Some(1));
    assert_eq!(store.create_deck("Chemistry", 1).unwrap(), 2);
    assert_eq!(
        store.create_flashcard("Atom", "Smallest unit?", "Atom", 1).unwrap(),
        2
    );
}

#[test]
fn forced_migrate_at_current_version_keeps_rows() {
    let mut store = common::memory_store();
    let category = store.create_category("Science").unwrap();
    let deck = store.create_deck("Biology", category).unwrap();

    store.force_upgrade(UpgradePolicy::Migrate).unwrap();

    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(store.get_category(category).unwrap().unwrap().title, "Science");
    assert_eq!(store.list_decks(category).unwrap()[0].id, deck);
    assert!(matches!(
        store.create_deck("Orphan", 999).unwrap_err(),
        StoreError::UnknownParent { .. }
    ));
}

#[test]
fn forced_recreate_empties_current_schema() {
    let mut store = common::memory_store();
    let category = store.create_category("Science").unwrap();
    let deck = store.create_deck("Biology", category).unwrap();
    store
        .create_flashcard("Cell", "What is a cell?", "Basic unit of life", deck)
        .unwrap();

    store.force_upgrade(UpgradePolicy::Recreate).unwrap();

    assert!(store.list_categories().unwrap().is_empty());
    assert!(store.list_decks(category).unwrap().is_empty());
    assert!(store.list_flashcards(deck).unwrap().is_empty());
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn newer_schema_version_fails_open() {
    let ctx = TestContext::new();
    drop(ctx.open());
    {
        let conn = rusqlite::Connection::open(ctx.db_path()).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
    }

    let err = FlashcardStore::open(&ctx.config()).err().unwrap();
    assert!(matches!(err, StoreError::SchemaTooNew { found: 2, supported: 1 }));
}

#[test]
fn unwritable_location_is_an_open_failure() {
    let ctx = TestContext::new();
    let blocker = ctx.dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let config = StoreConfig::at(blocker.join("flashcards.db"));
    let err = FlashcardStore::open(&config).err().unwrap();
    assert!(matches!(err, StoreError::Open { .. }));
}

#[test]
fn read_only_file_is_an_open_failure() {
    let ctx = TestContext::new();
    drop(ctx.open());

    let path = ctx.db_path();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    // Privileged users can still write, so there is nothing to check.
    if std::fs::OpenOptions::new().write(true).open(&path).is_ok() {
        return;
    }

    let err = FlashcardStore::open(&ctx.config()).err().unwrap();
    assert!(matches!(err, StoreError::Open { .. }));
}

#[test]
fn config_file_drives_open() {
    let ctx = TestContext::new();
    let config_path = ctx.dir.path().join("store.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "database_path": ctx.db_path(),
            "enforce_foreign_keys": false,
        })
        .to_string(),
    )
    .unwrap();

    let config = StoreConfig::from_json_file(&config_path).unwrap();
    let store = FlashcardStore::open(&config).unwrap();

    assert_eq!(store.create_deck("Orphan", 5).unwrap(), 1);
    assert_eq!(ctx.count_rows("decks"), 1);
}
