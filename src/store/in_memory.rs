//! InMemoryStore - HashMap-backed entity store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{fold_key, EntityStore, ForeignKey, Page, Record, StoreError, Stored};

/// Internal stored representation of a row.
struct StoredRow {
    bytes: Vec<u8>,
    table: &'static str,
    folded_key: String,
    foreign: Option<ForeignKey>,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<String, StoredRow>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let next = self.sequences.entry(table).or_insert(0);
        *next += 1;
        *next
    }

    fn check_unique(
        &self,
        table: &'static str,
        key: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), StoreError> {
        let folded = fold_key(key);
        let skip = exclude_id.map(|id| InMemoryStore::make_key(table, id));
        let taken = self.rows.iter().any(|(row_key, row)| {
            row.table == table && row.folded_key == folded && Some(row_key) != skip.as_ref()
        });
        if taken {
            return Err(StoreError::UniqueViolation {
                table,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn check_foreign(&self, fk: &ForeignKey) -> Result<(), StoreError> {
        if self
            .rows
            .contains_key(&InMemoryStore::make_key(fk.table, fk.id))
        {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation {
                table: fk.table,
                column: fk.column,
                id: fk.id,
            })
        }
    }

    fn referencing(&self, table: &str, id: i64) -> impl Iterator<Item = &StoredRow> + '_ {
        let table = table.to_string();
        self.rows.values().filter(move |row| {
            row.foreign
                .map(|fk| fk.table == table && fk.id == id)
                .unwrap_or(false)
        })
    }

    fn put<R: Record>(&mut self, row: &Stored<R>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(row).map_err(|e| StoreError::Serde(e.to_string()))?;
        self.rows.insert(
            InMemoryStore::make_key(R::TABLE, row.id),
            StoredRow {
                bytes,
                table: R::TABLE,
                folded_key: fold_key(row.data.unique_key()),
                foreign: row.data.foreign_key(),
            },
        );
        Ok(())
    }

    fn decode<R: Record>(row: &StoredRow) -> Result<Stored<R>, StoreError> {
        serde_json::from_slice(&row.bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn load<R: Record>(&self, id: i64) -> Result<Option<Stored<R>>, StoreError> {
        match self.rows.get(&InMemoryStore::make_key(R::TABLE, id)) {
            Some(row) => Self::decode(row).map(Some),
            None => Ok(None),
        }
    }

    fn scan<R: Record>(&self) -> Result<Vec<Stored<R>>, StoreError> {
        self.rows
            .values()
            .filter(|row| row.table == R::TABLE)
            .map(Self::decode)
            .collect()
    }
}

/// In-memory entity store backed by a HashMap.
///
/// Storage key is `"table:id"`. Clone-friendly via Arc; every clone sees
/// the same tables.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    fn make_key(table: &str, id: i64) -> String {
        format!("{}:{}", table, id)
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }
}

impl EntityStore for InMemoryStore {
    fn get<R: Record>(&self, id: i64) -> Result<Option<Stored<R>>, StoreError> {
        self.read("get")?.load(id)
    }

    fn find_by_key<R: Record>(
        &self,
        key: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Stored<R>>, StoreError> {
        let tables = self.read("find_by_key")?;
        let folded = fold_key(key);
        let found = tables
            .rows
            .values()
            .filter(|row| row.table == R::TABLE && row.folded_key == folded)
            .map(Tables::decode::<R>)
            .find(|row| match row {
                Ok(stored) => Some(stored.id) != exclude_id,
                Err(_) => true,
            });
        found.transpose()
    }

    fn list<R: Record>(
        &self,
        filter: &dyn Fn(&Stored<R>) -> bool,
        order: &dyn Fn(&Stored<R>, &Stored<R>) -> Ordering,
        page: Page,
    ) -> Result<Vec<Stored<R>>, StoreError> {
        let mut rows: Vec<Stored<R>> = self
            .read("list")?
            .scan::<R>()?
            .into_iter()
            .filter(|row| filter(row))
            .collect();
        rows.sort_by(|a, b| order(a, b));
        Ok(rows.into_iter().skip(page.skip).take(page.limit).collect())
    }

    fn count<R: Record>(&self, filter: &dyn Fn(&Stored<R>) -> bool) -> Result<usize, StoreError> {
        let rows = self.read("count")?.scan::<R>()?;
        Ok(rows.iter().filter(|&row| filter(row)).count())
    }

    fn insert<R: Record>(&self, data: R) -> Result<Stored<R>, StoreError> {
        let mut tables = self.write("insert")?;
        tables.check_unique(R::TABLE, data.unique_key(), None)?;
        if let Some(fk) = data.foreign_key() {
            tables.check_foreign(&fk)?;
        }

        let stored = Stored {
            id: tables.next_id(R::TABLE),
            data,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        tables.put(&stored)?;
        Ok(stored)
    }

    fn update<R: Record>(&self, id: i64, data: R) -> Result<Stored<R>, StoreError> {
        let mut tables = self.write("update")?;
        let existing = tables
            .load::<R>(id)?
            .ok_or(StoreError::NotFound { table: R::TABLE, id })?;

        tables.check_unique(R::TABLE, data.unique_key(), Some(id))?;
        if let Some(fk) = data.foreign_key() {
            tables.check_foreign(&fk)?;
        }

        let stored = Stored {
            id,
            data,
            created_at: existing.created_at,
            updated_at: Some(Utc::now().naive_utc()),
        };
        tables.put(&stored)?;
        Ok(stored)
    }

    fn delete<R: Record>(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.write("delete")?;
        let key = Self::make_key(R::TABLE, id);
        if !tables.rows.contains_key(&key) {
            return Ok(false);
        }

        if let Some(row) = tables.referencing(R::TABLE, id).next() {
            return Err(StoreError::RestrictViolation {
                table: R::TABLE,
                id,
                referenced_by: row.table,
            });
        }

        Ok(tables.rows.remove(&key).is_some())
    }

    fn count_referencing(&self, table: &str, id: i64) -> Result<usize, StoreError> {
        Ok(self.read("count_referencing")?.referencing(table, id).count())
    }
}
