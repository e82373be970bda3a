pub mod config;
pub mod domain;
pub mod envelope;
#[cfg(feature = "http")]
pub mod http;
pub mod projection;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{ConfigError, Settings};
pub use domain::{
    DumpTruck, DumpTruckInput, HydratedTruck, LoadFigures, TruckModel, TruckModelInput,
    ValidationError,
};
pub use envelope::{ApiResponse, Envelope, PageLinks, PageMeta, Paging, RequestContext};
pub use projection::{project, ModelProjection, Project, Projection, TruckProjection};
pub use seed::{seed_demo_data, SeedOutcome};
pub use service::{EntityKind, ServiceError, TruckFilter, TruckModelService, TruckService};
pub use store::{
    EntityStore, ForeignKey, InMemoryStore, Page, Record, StoreError, Stored, TableRef, TablesExt,
};
