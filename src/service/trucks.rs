//! TruckService - invariant-checked CRUD for dump trucks.

use std::collections::HashMap;

use tracing::debug;

use super::error::{EntityKind, ServiceError};
use crate::domain::{DumpTruck, HydratedTruck, TruckModel};
use crate::store::{fold_key, EntityStore, Page, Stored, TablesExt};

/// Free-text filters for truck listings. Both match case-insensitive
/// substrings; empty strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruckFilter {
    pub board_number: Option<String>,
    /// Matched against the name of the truck's model.
    pub model_name: Option<String>,
}

impl TruckFilter {
    fn needle(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(fold_key)
    }
}

/// Truck operations over a shared store. Every returned truck carries its
/// model.
#[derive(Clone)]
pub struct TruckService<S> {
    store: S,
}

impl<S: EntityStore> TruckService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: i64) -> Result<HydratedTruck, ServiceError> {
        let row = self.get_row(id)?;
        self.hydrate(row)
    }

    /// One page of trucks ordered by id, plus the number of trucks matching
    /// the same filter.
    pub fn list(
        &self,
        filter: &TruckFilter,
        page: Page,
    ) -> Result<(Vec<HydratedTruck>, usize), ServiceError> {
        let models: HashMap<i64, Stored<TruckModel>> = self
            .store
            .table::<TruckModel>()
            .list(&|_| true, &|a, b| a.id.cmp(&b.id), Page::all())?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let board_number = TruckFilter::needle(&filter.board_number);
        let model_name = TruckFilter::needle(&filter.model_name);
        let matches = |row: &Stored<DumpTruck>| {
            let board_ok = board_number
                .as_ref()
                .map_or(true, |needle| fold_key(&row.data.board_number).contains(needle));
            let model_ok = model_name.as_ref().map_or(true, |needle| {
                models
                    .get(&row.data.model_id)
                    .map_or(false, |model| fold_key(&model.data.name).contains(needle))
            });
            board_ok && model_ok
        };

        let trucks = self.store.table::<DumpTruck>();
        let total = trucks.count(&matches)?;
        let rows = trucks.list(&matches, &|a, b| a.id.cmp(&b.id), page)?;

        let hydrated = rows
            .into_iter()
            .map(|row| match models.get(&row.data.model_id) {
                Some(model) => Ok(HydratedTruck::new(row, model.clone())),
                None => self.hydrate(row),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((hydrated, total))
    }

    pub fn create(&self, truck: DumpTruck) -> Result<HydratedTruck, ServiceError> {
        self.ensure_model_exists(truck.model_id)?;
        self.ensure_board_number_free(&truck.board_number, None)?;

        let row = self.store.table::<DumpTruck>().insert(truck)?;
        debug!(
            id = row.id,
            board_number = %row.data.board_number,
            model_id = row.data.model_id,
            "dump truck created"
        );
        self.hydrate(row)
    }

    pub fn update(&self, id: i64, truck: DumpTruck) -> Result<HydratedTruck, ServiceError> {
        let existing = self.get_row(id)?;

        if truck.model_id != existing.data.model_id {
            self.ensure_model_exists(truck.model_id)?;
        }
        if fold_key(&truck.board_number) != fold_key(&existing.data.board_number) {
            self.ensure_board_number_free(&truck.board_number, Some(id))?;
        }

        let row = self.store.table::<DumpTruck>().update(id, truck)?;
        debug!(id, board_number = %row.data.board_number, "dump truck updated");
        self.hydrate(row)
    }

    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.get_row(id)?;
        self.store.table::<DumpTruck>().delete(id)?;
        debug!(id, "dump truck deleted");
        Ok(())
    }

    fn get_row(&self, id: i64) -> Result<Stored<DumpTruck>, ServiceError> {
        self.store
            .table::<DumpTruck>()
            .get(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Truck,
                id,
            })
    }

    fn hydrate(&self, row: Stored<DumpTruck>) -> Result<HydratedTruck, ServiceError> {
        let model_id = row.data.model_id;
        let model = self
            .store
            .table::<TruckModel>()
            .get(model_id)?
            .ok_or(ServiceError::ReferenceNotFound {
                entity: EntityKind::Model,
                id: model_id,
            })?;
        Ok(HydratedTruck::new(row, model))
    }

    fn ensure_model_exists(&self, model_id: i64) -> Result<(), ServiceError> {
        if self.store.table::<TruckModel>().get(model_id)?.is_none() {
            debug!(model_id, "dump truck rejected: unknown model");
            return Err(ServiceError::ReferenceNotFound {
                entity: EntityKind::Model,
                id: model_id,
            });
        }
        Ok(())
    }

    fn ensure_board_number_free(
        &self,
        board_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), ServiceError> {
        let clash = self
            .store
            .table::<DumpTruck>()
            .find_by_key(board_number, exclude_id)?;
        if clash.is_some() {
            debug!(board_number, "dump truck rejected: board number taken");
            return Err(ServiceError::DuplicateKey {
                entity: EntityKind::Truck,
                value: board_number.to_string(),
            });
        }
        Ok(())
    }
}
