//! Database error types.

use std::path::PathBuf;

use flashcard_core::{RowId, ValidationError};
use rusqlite::ErrorCode;
use thiserror::Error;

use super::schema::REQUIRED_COLUMNS;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("constraint violation: {table}.{column} is required")]
    ConstraintViolation {
        table: &'static str,
        column: &'static str,
    },

    #[error("{table} row references missing parent id {id}")]
    UnknownParent { table: &'static str, id: RowId },

    #[error("schema error at version {version}: {source}")]
    Schema {
        version: u32,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid config: {0}")]
    Config(String),
}

impl StoreError {
    /// Map a validation failure on a row headed for `table`.
    pub(crate) fn invalid(table: &'static str, err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => Self::ConstraintViolation {
                table,
                column: field,
            },
        }
    }

    /// Translate an insert failure into a typed error.
    ///
    /// SQLite reports foreign key and NOT NULL failures under the same
    /// primary code, so the extended code decides.
    pub(crate) fn from_insert(
        table: &'static str,
        parent_id: Option<RowId>,
        err: rusqlite::Error,
    ) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.code == ErrorCode::ConstraintViolation {
                match (failure.extended_code, parent_id) {
                    (rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY, Some(id)) => {
                        return Self::UnknownParent { table, id };
                    }
                    (rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL, _) => {
                        return Self::ConstraintViolation {
                            table,
                            column: not_null_column(message.as_deref()),
                        };
                    }
                    _ => {}
                }
            }
        }
        Self::Sqlite(err)
    }
}

/// Column named in "NOT NULL constraint failed: table.column", falling back
/// to `title`, which every table requires.
fn not_null_column(message: Option<&str>) -> &'static str {
    message
        .and_then(|m| m.rsplit('.').next())
        .and_then(|name| REQUIRED_COLUMNS.iter().copied().find(|c| *c == name))
        .unwrap_or("title")
}
