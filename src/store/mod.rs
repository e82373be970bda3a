//! Entity store - typed CRUD storage for fleet records.
//!
//! The store owns every persisted row. Each call is atomic on its own and
//! observes all writes made by earlier calls, so a create followed by a
//! re-read inside one operation always sees the new row.
//!
//! Tables carry the same constraints the relational layout declares:
//! a case-insensitive unique column, an optional foreign key, and
//! `ON DELETE RESTRICT` for referenced rows. The consistency layer checks
//! these first for friendlier errors; the store remains the final guard.
//!
//! ## Example
//!
//! ```ignore
//! use fleet_monitor::{InMemoryStore, TablesExt, TruckModel};
//!
//! let store = InMemoryStore::new();
//! let belaz = store.table::<TruckModel>().insert(TruckModel::new("BELAZ", 120))?;
//! let loaded = store.table::<TruckModel>().get(belaz.id)?;
//! ```

mod in_memory;
mod table;

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Trait for types that can be persisted as rows of a table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Table name (`truck_models`, `dump_trucks`).
    const TABLE: &'static str;

    /// Value of the table's unique column. Compared case-insensitively.
    fn unique_key(&self) -> &str;

    /// Outgoing reference to a row of another table, if the table has one.
    fn foreign_key(&self) -> Option<ForeignKey> {
        None
    }
}

/// A reference from one row to a row of another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub id: i64,
}

/// A persisted row: the record data plus the columns the store manages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: i64,
    pub data: T,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Offset/limit window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Every row.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: usize::MAX,
        }
    }

    /// Window for a 1-based page number.
    pub fn from_number(page: u64, per_page: u64) -> Self {
        let skip = page.saturating_sub(1).saturating_mul(per_page);
        Self {
            skip: usize::try_from(skip).unwrap_or(usize::MAX),
            limit: usize::try_from(per_page).unwrap_or(usize::MAX),
        }
    }
}

/// Error type for entity store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// Row serialization/deserialization error.
    Serde(String),
    /// Unique column collision.
    UniqueViolation { table: &'static str, key: String },
    /// Foreign key points at a missing row.
    ForeignKeyViolation {
        table: &'static str,
        column: &'static str,
        id: i64,
    },
    /// Delete blocked because other rows still reference this one.
    RestrictViolation {
        table: &'static str,
        id: i64,
        referenced_by: &'static str,
    },
    /// Row not found.
    NotFound { table: &'static str, id: i64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Serde(msg) => write!(f, "row serialization error: {}", msg),
            StoreError::UniqueViolation { table, key } => {
                write!(f, "unique constraint violated on {}: {}", table, key)
            }
            StoreError::ForeignKeyViolation { table, column, id } => write!(
                f,
                "foreign key violated: {}.{} references missing row {}",
                table, column, id
            ),
            StoreError::RestrictViolation {
                table,
                id,
                referenced_by,
            } => write!(
                f,
                "cannot delete {}:{} while referenced by {}",
                table, id, referenced_by
            ),
            StoreError::NotFound { table, id } => write!(f, "row not found: {}:{}", table, id),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstract CRUD storage for records.
pub trait EntityStore: Send + Sync {
    /// Get a row by id. Returns None if not found.
    fn get<R: Record>(&self, id: i64) -> Result<Option<Stored<R>>, StoreError>;

    /// Find the row whose unique column equals `key` ignoring case,
    /// optionally skipping the row `exclude_id`.
    fn find_by_key<R: Record>(
        &self,
        key: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Stored<R>>, StoreError>;

    /// Filtered, ordered listing restricted to `page`.
    fn list<R: Record>(
        &self,
        filter: &dyn Fn(&Stored<R>) -> bool,
        order: &dyn Fn(&Stored<R>, &Stored<R>) -> Ordering,
        page: Page,
    ) -> Result<Vec<Stored<R>>, StoreError>;

    /// Number of rows matching `filter`.
    fn count<R: Record>(&self, filter: &dyn Fn(&Stored<R>) -> bool) -> Result<usize, StoreError>;

    /// Insert a new row; the store assigns id and `created_at`.
    fn insert<R: Record>(&self, data: R) -> Result<Stored<R>, StoreError>;

    /// Replace the data of an existing row and stamp `updated_at`.
    fn update<R: Record>(&self, id: i64, data: R) -> Result<Stored<R>, StoreError>;

    /// Delete a row by id. Returns true if it existed.
    fn delete<R: Record>(&self, id: i64) -> Result<bool, StoreError>;

    /// Number of rows (in any table) whose foreign key points at `table:id`.
    fn count_referencing(&self, table: &str, id: i64) -> Result<usize, StoreError>;
}

/// Case folding used for unique columns.
pub(crate) fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

pub use in_memory::InMemoryStore;
pub use table::{TableRef, TablesExt};
