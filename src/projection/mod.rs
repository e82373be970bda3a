//! Projections - flatten fleet entities into serialization-ready JSON.
//!
//! Each entity kind has a fixed projection struct. Computed load figures
//! and the nested model only appear when the truck's model was loaded;
//! a bare truck row projects to its persisted columns alone.
//!
//! Containers project element-wise through the [`Project`] trait, so a
//! page of trucks, an optional model or a keyed map of either can be
//! handed to the envelope builder as-is.
//!
//! ## Example
//!
//! ```ignore
//! use fleet_monitor::projection::Project;
//!
//! let (trucks, total) = service.list(&filter, page)?;
//! let data = trucks.project(); // JSON array of truck objects
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{DumpTruck, HydratedTruck, TruckModel};
use crate::store::Stored;

/// Flattened truck model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProjection {
    pub id: i64,
    pub name: String,
    pub max_capacity: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Flattened truck. Computed fields and `model` are omitted when the model
/// was not loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruckProjection {
    pub id: i64,
    pub board_number: String,
    pub current_weight: i64,
    pub model_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overload_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_overloaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelProjection>,
}

/// Projection of any fleet entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projection {
    Model(ModelProjection),
    Truck(TruckProjection),
}

impl From<&Stored<TruckModel>> for ModelProjection {
    fn from(row: &Stored<TruckModel>) -> Self {
        Self {
            id: row.id,
            name: row.data.name.clone(),
            max_capacity: row.data.max_capacity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&HydratedTruck> for TruckProjection {
    fn from(truck: &HydratedTruck) -> Self {
        let row = &truck.row;
        let figures = truck.load_figures();
        Self {
            id: row.id,
            board_number: row.data.board_number.clone(),
            current_weight: row.data.current_weight,
            model_id: row.data.model_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            load_percentage: figures.map(|f| f.load_percentage),
            overload_percentage: figures.map(|f| f.overload_percentage),
            is_overloaded: figures.map(|f| f.is_overloaded),
            model: truck.model.as_ref().map(ModelProjection::from),
        }
    }
}

/// Conversion into a plain JSON structure of primitives, objects and arrays.
pub trait Project {
    fn project(&self) -> Value;
}

/// Project any value; shorthand for `value.project()`.
pub fn project<T: Project + ?Sized>(value: &T) -> Value {
    value.project()
}

impl Project for Projection {
    fn project(&self) -> Value {
        // projections hold only strings, numbers and timestamps
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Project for Stored<TruckModel> {
    fn project(&self) -> Value {
        Projection::Model(self.into()).project()
    }
}

impl Project for HydratedTruck {
    fn project(&self) -> Value {
        Projection::Truck(self.into()).project()
    }
}

impl Project for Stored<DumpTruck> {
    fn project(&self) -> Value {
        HydratedTruck::from(self.clone()).project()
    }
}

impl Project for Value {
    fn project(&self) -> Value {
        self.clone()
    }
}

impl<T: Project + ?Sized> Project for &T {
    fn project(&self) -> Value {
        (**self).project()
    }
}

impl<T: Project> Project for Option<T> {
    fn project(&self) -> Value {
        match self {
            Some(value) => value.project(),
            None => Value::Null,
        }
    }
}

impl<T: Project> Project for [T] {
    fn project(&self) -> Value {
        Value::Array(self.iter().map(Project::project).collect())
    }
}

impl<T: Project> Project for Vec<T> {
    fn project(&self) -> Value {
        self.as_slice().project()
    }
}

/// Sets have no stable order; elements come out in iteration order.
impl<T: Project, H> Project for HashSet<T, H> {
    fn project(&self) -> Value {
        Value::Array(self.iter().map(Project::project).collect())
    }
}

impl<T: Project, H> Project for HashMap<String, T, H> {
    fn project(&self) -> Value {
        Value::Object(project_entries(self.iter()))
    }
}

impl<T: Project> Project for BTreeMap<String, T> {
    fn project(&self) -> Value {
        Value::Object(project_entries(self.iter()))
    }
}

fn project_entries<'a, T: Project + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a T)>,
) -> Map<String, Value> {
    entries
        .map(|(key, value)| (key.clone(), value.project()))
        .collect()
}

macro_rules! project_primitive {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Project for $ty {
                fn project(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )+
    };
}

project_primitive!(bool, i32, i64, u32, u64, usize, f64, String);

impl Project for str {
    fn project(&self) -> Value {
        Value::from(self)
    }
}
