use serde::{Deserialize, Serialize};

use super::{LoadFigures, TruckModel, ValidationError};
use crate::store::{ForeignKey, Record, Stored};

pub const BOARD_NUMBER_MAX_LEN: usize = 10;
pub const MAX_CURRENT_WEIGHT: i64 = 500;

/// A single haul truck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpTruck {
    /// Trimmed, uppercase, alphanumeric.
    pub board_number: String,
    /// Current payload, tonnes.
    pub current_weight: i64,
    pub model_id: i64,
}

impl DumpTruck {
    pub fn new(board_number: impl Into<String>, current_weight: i64, model_id: i64) -> Self {
        Self {
            board_number: board_number.into(),
            current_weight,
            model_id,
        }
    }
}

impl Record for DumpTruck {
    const TABLE: &'static str = "dump_trucks";

    fn unique_key(&self) -> &str {
        &self.board_number
    }

    fn foreign_key(&self) -> Option<ForeignKey> {
        Some(ForeignKey {
            table: TruckModel::TABLE,
            column: "model_id",
            id: self.model_id,
        })
    }
}

/// A truck row together with its eagerly loaded model.
///
/// `model` is `None` only when a caller builds one from a bare row; the
/// truck service always fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedTruck {
    pub row: Stored<DumpTruck>,
    pub model: Option<Stored<TruckModel>>,
}

impl HydratedTruck {
    pub fn new(row: Stored<DumpTruck>, model: Stored<TruckModel>) -> Self {
        Self {
            row,
            model: Some(model),
        }
    }

    pub fn load_figures(&self) -> Option<LoadFigures> {
        self.model.as_ref().map(|model| {
            LoadFigures::compute(self.row.data.current_weight, model.data.max_capacity)
        })
    }
}

impl From<Stored<DumpTruck>> for HydratedTruck {
    fn from(row: Stored<DumpTruck>) -> Self {
        Self { row, model: None }
    }
}

/// Create/replace payload for a truck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpTruckInput {
    pub model_id: i64,
    pub board_number: String,
    #[serde(default)]
    pub current_weight: Option<i64>,
}

impl DumpTruckInput {
    pub fn validate(self) -> Result<DumpTruck, ValidationError> {
        if self.model_id < 1 {
            return Err(ValidationError::new("model_id", "must be at least 1"));
        }
        let board_number = normalize_board_number(&self.board_number)?;

        let current_weight = self.current_weight.unwrap_or(0);
        if current_weight < 0 {
            return Err(ValidationError::new("current_weight", "must not be negative"));
        }
        if current_weight > MAX_CURRENT_WEIGHT {
            return Err(ValidationError::new(
                "current_weight",
                format!("must not exceed {} tonnes", MAX_CURRENT_WEIGHT),
            ));
        }

        Ok(DumpTruck::new(board_number, current_weight, self.model_id))
    }
}

/// Trim and uppercase a board number, rejecting blank or non-alphanumeric input.
pub fn normalize_board_number(raw: &str) -> Result<String, ValidationError> {
    let too_long = || {
        ValidationError::new(
            "board_number",
            format!("must be at most {} characters", BOARD_NUMBER_MAX_LEN),
        )
    };

    if raw.chars().count() > BOARD_NUMBER_MAX_LEN {
        return Err(too_long());
    }
    let cleaned = raw.trim().to_uppercase();
    if cleaned.is_empty() {
        return Err(ValidationError::new("board_number", "must not be blank"));
    }
    if !cleaned.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::new(
            "board_number",
            "may contain only letters and digits",
        ));
    }
    // uppercasing can expand some characters (e.g. 'ß' -> "SS")
    if cleaned.chars().count() > BOARD_NUMBER_MAX_LEN {
        return Err(too_long());
    }
    Ok(cleaned)
}
