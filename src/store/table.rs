//! TableRef - Typed accessor for one table of an entity store.

use std::cmp::Ordering;
use std::marker::PhantomData;

use super::{EntityStore, Page, Record, StoreError, Stored};

/// Typed wrapper for accessing rows of a specific record type.
pub struct TableRef<'a, S, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

impl<'a, S: EntityStore, R: Record> TableRef<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, id: i64) -> Result<Option<Stored<R>>, StoreError> {
        self.store.get(id)
    }

    pub fn find_by_key(
        &self,
        key: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Stored<R>>, StoreError> {
        self.store.find_by_key(key, exclude_id)
    }

    pub fn list(
        &self,
        filter: &dyn Fn(&Stored<R>) -> bool,
        order: &dyn Fn(&Stored<R>, &Stored<R>) -> Ordering,
        page: Page,
    ) -> Result<Vec<Stored<R>>, StoreError> {
        self.store.list(filter, order, page)
    }

    pub fn count(&self, filter: &dyn Fn(&Stored<R>) -> bool) -> Result<usize, StoreError> {
        self.store.count(filter)
    }

    /// True if the table holds no rows.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.count(&|_| true)? == 0)
    }

    pub fn insert(&self, data: R) -> Result<Stored<R>, StoreError> {
        self.store.insert(data)
    }

    pub fn update(&self, id: i64, data: R) -> Result<Stored<R>, StoreError> {
        self.store.update(id, data)
    }

    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.store.delete::<R>(id)
    }

    /// Rows of other tables whose foreign key points at `id` in this table.
    pub fn referencing(&self, id: i64) -> Result<usize, StoreError> {
        self.store.count_referencing(R::TABLE, id)
    }
}

/// Extension trait for typed table access on any EntityStore.
pub trait TablesExt: EntityStore + Sized {
    fn table<R: Record>(&self) -> TableRef<'_, Self, R> {
        TableRef::new(self)
    }
}

impl<S: EntityStore> TablesExt for S {}
