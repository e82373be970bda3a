use fleet_monitor::{
    DumpTruck, HydratedTruck, InMemoryStore, Stored, TruckModel, TruckModelService, TruckService,
};

/// Both services over one fresh store.
pub struct Fleet {
    pub models: TruckModelService<InMemoryStore>,
    pub trucks: TruckService<InMemoryStore>,
}

impl Fleet {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        Self {
            models: TruckModelService::new(store.clone()),
            trucks: TruckService::new(store),
        }
    }

    pub fn model(&self, name: &str, max_capacity: i64) -> Stored<TruckModel> {
        self.models
            .create(TruckModel::new(name, max_capacity))
            .unwrap()
    }

    pub fn truck(&self, board_number: &str, weight: i64, model_id: i64) -> HydratedTruck {
        self.trucks
            .create(DumpTruck::new(board_number, weight, model_id))
            .unwrap()
    }
}
