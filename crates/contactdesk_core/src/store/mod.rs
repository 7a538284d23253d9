//! Store contracts shared by the transient and durable backends.
//!
//! # Responsibility
//! - Define the persistence abstraction consumed by the service layer.
//! - Keep backend-specific failure detail behind one error type.
//!
//! # Invariants
//! - Every aggregate crossing the store boundary, in either direction, is a
//!   defensive copy; the canonical instance never leaves the store.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::{Aggregate, DomainError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_sqlite;
pub mod contact_sqlite;
pub mod memory;
pub mod task_sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy for store operations.
#[derive(Debug)]
pub enum StoreError {
    Domain(DomainError),
    Db(DbError),
    /// An insert lost the uniqueness race; the service layer normalizes this
    /// to a duplicate-add failure return.
    DuplicateId(String),
    /// A persisted row failed aggregate revalidation on load.
    InvalidData(String),
    SchemaNotReady {
        expected_version: u32,
        actual_version: u32,
    },
    MissingTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "id already stored: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::SchemaNotReady {
                expected_version,
                actual_version,
            } => write!(
                f,
                "schema version {actual_version} does not match required {expected_version}; run migrations first"
            ),
            Self::MissingTable(table) => write!(f, "required table is missing: {table}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateId(_)
            | Self::InvalidData(_)
            | Self::SchemaNotReady { .. }
            | Self::MissingTable(_) => None,
        }
    }
}

impl From<DomainError> for StoreError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence abstraction for one aggregate family.
///
/// `insert` is the add-path primitive: atomic first-writer-wins keyed by id.
/// `save` is the upsert used by the update path. Both store a defensive copy
/// of the given aggregate, and every read returns a fresh copy the caller
/// owns outright.
pub trait Store<A: Aggregate>: Send + Sync {
    fn exists_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Stores a copy iff the id is absent; returns whether it was stored.
    fn insert(&self, aggregate: &A) -> StoreResult<bool>;

    /// Upserts a copy under the aggregate's id.
    fn save(&self, aggregate: &A) -> StoreResult<()>;

    fn find_by_id(&self, id: &str) -> StoreResult<Option<A>>;

    /// Returns copies of all stored aggregates; order is not guaranteed.
    fn find_all(&self) -> StoreResult<Vec<A>>;

    /// Returns whether an entry was removed.
    fn delete_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Clears all data. Reserved for test isolation, not part of the
    /// externally advertised contract.
    fn delete_all(&self) -> StoreResult<()>;
}

/// Refuses connections that have not been migrated to the current schema or
/// that lack the backend's table.
pub(crate) fn ensure_schema_ready(conn: &Connection, table: &'static str) -> StoreResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = crate::db::migrations::latest_version();
    if actual_version != expected_version {
        return Err(StoreError::SchemaNotReady {
            expected_version,
            actual_version,
        });
    }

    let present: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if !present {
        return Err(StoreError::MissingTable(table));
    }

    Ok(())
}

/// Returns whether a sqlite error is a uniqueness-constraint violation, the
/// signal the durable `insert` translates into a lost race.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
