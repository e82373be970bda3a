//! TruckModelService - invariant-checked CRUD for truck models.

use std::cmp::Ordering;

use tracing::debug;

use super::error::{EntityKind, ServiceError};
use crate::domain::TruckModel;
use crate::store::{fold_key, EntityStore, Page, Stored, TablesExt};

/// Truck model operations over a shared store.
#[derive(Clone)]
pub struct TruckModelService<S> {
    store: S,
}

impl<S: EntityStore> TruckModelService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: i64) -> Result<Stored<TruckModel>, ServiceError> {
        self.store
            .table::<TruckModel>()
            .get(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Model,
                id,
            })
    }

    /// One page of models sorted by name, plus the total model count.
    pub fn list(&self, page: Page) -> Result<(Vec<Stored<TruckModel>>, usize), ServiceError> {
        let models = self.store.table::<TruckModel>();
        let total = models.count(&|_| true)?;
        let rows = models.list(&|_| true, &by_name, page)?;
        Ok((rows, total))
    }

    pub fn create(&self, model: TruckModel) -> Result<Stored<TruckModel>, ServiceError> {
        self.ensure_name_free(&model.name, None)?;

        let stored = self.store.table::<TruckModel>().insert(model)?;
        debug!(id = stored.id, name = %stored.data.name, "truck model created");
        Ok(stored)
    }

    pub fn update(&self, id: i64, model: TruckModel) -> Result<Stored<TruckModel>, ServiceError> {
        let existing = self.get(id)?;
        if fold_key(&model.name) != fold_key(&existing.data.name) {
            self.ensure_name_free(&model.name, Some(id))?;
        }

        let stored = self.store.table::<TruckModel>().update(id, model)?;
        debug!(id, name = %stored.data.name, "truck model updated");
        Ok(stored)
    }

    /// Delete a model that no truck references.
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let models = self.store.table::<TruckModel>();
        self.get(id)?;

        let trucks = models.referencing(id)?;
        if trucks > 0 {
            debug!(id, trucks, "truck model delete rejected: still in use");
            return Err(ServiceError::InUse {
                entity: EntityKind::Model,
                id,
            });
        }

        models.delete(id)?;
        debug!(id, "truck model deleted");
        Ok(())
    }

    fn ensure_name_free(&self, name: &str, exclude_id: Option<i64>) -> Result<(), ServiceError> {
        let clash = self
            .store
            .table::<TruckModel>()
            .find_by_key(name, exclude_id)?;
        if clash.is_some() {
            debug!(name, "truck model name already taken");
            return Err(ServiceError::DuplicateKey {
                entity: EntityKind::Model,
                value: name.to_string(),
            });
        }
        Ok(())
    }
}

fn by_name(a: &Stored<TruckModel>, b: &Stored<TruckModel>) -> Ordering {
    a.data.name.cmp(&b.data.name).then(a.id.cmp(&b.id))
}
