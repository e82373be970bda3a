//! Demo fleet loaded into an empty store at startup.

use tracing::info;

use crate::domain::{DumpTruck, TruckModel};
use crate::service::{ServiceError, TruckModelService, TruckService};
use crate::store::{EntityStore, TablesExt};

const DEMO_MODELS: [(&str, i64); 2] = [("BELAZ", 120), ("Komatsu", 110)];

/// Board number, weight and index into `DEMO_MODELS`.
const DEMO_TRUCKS: [(&str, i64, usize); 3] = [("101", 100, 0), ("102", 125, 0), ("K103", 120, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { models: usize, trucks: usize },
    /// The store already held models.
    Skipped,
}

/// Create the demo models and trucks through the services, unless any model
/// already exists.
pub fn seed_demo_data<S: EntityStore + Clone>(store: &S) -> Result<SeedOutcome, ServiceError> {
    if !store.table::<TruckModel>().is_empty()? {
        info!("store already holds data, skipping demo seed");
        return Ok(SeedOutcome::Skipped);
    }

    let models = TruckModelService::new(store.clone());
    let trucks = TruckService::new(store.clone());

    let mut model_ids = Vec::with_capacity(DEMO_MODELS.len());
    for (name, max_capacity) in DEMO_MODELS {
        model_ids.push(models.create(TruckModel::new(name, max_capacity))?.id);
    }
    for (board_number, weight, model) in DEMO_TRUCKS {
        trucks.create(DumpTruck::new(board_number, weight, model_ids[model]))?;
    }

    info!(
        models = DEMO_MODELS.len(),
        trucks = DEMO_TRUCKS.len(),
        "demo fleet seeded"
    );
    Ok(SeedOutcome::Seeded {
        models: DEMO_MODELS.len(),
        trucks: DEMO_TRUCKS.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::TruckFilter;
    use crate::store::{InMemoryStore, Page};

    #[test]
    fn seeds_empty_store_once() {
        let store = InMemoryStore::new();
        assert_eq!(
            seed_demo_data(&store).unwrap(),
            SeedOutcome::Seeded { models: 2, trucks: 3 }
        );
        assert_eq!(seed_demo_data(&store).unwrap(), SeedOutcome::Skipped);

        let (trucks, total) = TruckService::new(store)
            .list(&TruckFilter::default(), Page::all())
            .unwrap();
        assert_eq!(total, 3);
        let overloaded: Vec<_> = trucks
            .iter()
            .filter(|t| t.load_figures().is_some_and(|f| f.is_overloaded))
            .map(|t| t.row.data.board_number.as_str())
            .collect();
        assert_eq!(overloaded, vec!["102", "K103"]);
    }
}
