use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::store::Record;

pub const MODEL_NAME_MAX_LEN: usize = 50;

/// Equipment class shared by many trucks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckModel {
    pub name: String,
    /// Maximum payload, tonnes.
    pub max_capacity: i64,
}

impl TruckModel {
    pub fn new(name: impl Into<String>, max_capacity: i64) -> Self {
        Self {
            name: name.into(),
            max_capacity,
        }
    }
}

impl Record for TruckModel {
    const TABLE: &'static str = "truck_models";

    fn unique_key(&self) -> &str {
        &self.name
    }
}

/// Create/replace payload for a truck model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckModelInput {
    pub name: String,
    pub max_capacity: i64,
}

impl TruckModelInput {
    pub fn validate(self) -> Result<TruckModel, ValidationError> {
        if self.name.chars().count() > MODEL_NAME_MAX_LEN {
            return Err(ValidationError::new(
                "name",
                format!("must be at most {} characters", MODEL_NAME_MAX_LEN),
            ));
        }
        if self.max_capacity < 1 {
            return Err(ValidationError::new("max_capacity", "must be at least 1"));
        }
        Ok(TruckModel::new(self.name, self.max_capacity))
    }
}
