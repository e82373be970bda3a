//! Consistency layer - invariant-checked CRUD over the entity store.
//!
//! `TruckModelService` and `TruckService` wrap a shared [`EntityStore`] and
//! guard every mutation:
//!
//! - model names and board numbers stay unique ignoring case
//! - every truck references an existing model
//! - a model cannot be deleted while trucks still use it
//!
//! Checks run in a fixed order: reference first, then uniqueness, then the
//! write. When a payload breaks several rules the reference error wins.
//!
//! ## Example
//!
//! ```ignore
//! use fleet_monitor::{InMemoryStore, TruckModel, TruckModelService, TruckService, DumpTruck};
//!
//! let store = InMemoryStore::new();
//! let models = TruckModelService::new(store.clone());
//! let trucks = TruckService::new(store);
//!
//! let belaz = models.create(TruckModel::new("BELAZ", 120))?;
//! let truck = trucks.create(DumpTruck::new("101", 100, belaz.id))?;
//! assert_eq!(truck.load_figures().unwrap().load_percentage, 83.33);
//! ```
//!
//! [`EntityStore`]: crate::store::EntityStore

mod error;
mod truck_models;
mod trucks;

pub use error::{EntityKind, ServiceError};
pub use truck_models::TruckModelService;
pub use trucks::{TruckFilter, TruckService};
