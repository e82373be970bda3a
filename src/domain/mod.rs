//! Fleet domain: truck models, dump trucks and their derived load figures.

mod dump_truck;
mod load;
mod truck_model;
mod validation;

pub use dump_truck::{
    normalize_board_number, DumpTruck, DumpTruckInput, HydratedTruck, BOARD_NUMBER_MAX_LEN,
    MAX_CURRENT_WEIGHT,
};
pub use load::LoadFigures;
pub use truck_model::{TruckModel, TruckModelInput, MODEL_NAME_MAX_LEN};
pub use validation::ValidationError;
