//! Error taxonomy for the consistency layer.

use std::error::Error;
use std::fmt;

use crate::domain::{DumpTruck, TruckModel, ValidationError};
use crate::store::{Record, StoreError};

/// The two kinds of fleet entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Model,
    Truck,
}

impl EntityKind {
    pub fn from_table(table: &str) -> Option<Self> {
        if table == TruckModel::TABLE {
            Some(EntityKind::Model)
        } else if table == DumpTruck::TABLE {
            Some(EntityKind::Truck)
        } else {
            None
        }
    }

    /// Human label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Model => "truck model",
            EntityKind::Truck => "dump truck",
        }
    }

    /// Name of the natural key column.
    pub fn key_field(self) -> &'static str {
        match self {
            EntityKind::Model => "name",
            EntityKind::Truck => "board_number",
        }
    }
}

/// Error type for consistency layer operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No entity with this id.
    NotFound { entity: EntityKind, id: i64 },
    /// A foreign id in the payload does not resolve.
    ReferenceNotFound { entity: EntityKind, id: i64 },
    /// Natural key collides with another row (case-insensitive).
    DuplicateKey { entity: EntityKind, value: String },
    /// Deletion blocked by rows that still reference the entity.
    InUse { entity: EntityKind, id: i64 },
    /// Static field constraint violated.
    Validation(ValidationError),
    /// Unexpected storage failure.
    Store(StoreError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound { entity, id } => {
                write!(f, "{} with id {} not found", entity.label(), id)
            }
            ServiceError::ReferenceNotFound { entity, id } => {
                write!(f, "referenced {} with id {} does not exist", entity.label(), id)
            }
            ServiceError::DuplicateKey { entity, value } => write!(
                f,
                "{} with {} '{}' already exists",
                entity.label(),
                entity.key_field(),
                value
            ),
            ServiceError::InUse { entity, id } => write!(
                f,
                "{} {} cannot be deleted while dump trucks use it",
                entity.label(),
                id
            ),
            ServiceError::Validation(e) => write!(f, "{}", e),
            ServiceError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServiceError::Validation(e) => Some(e),
            ServiceError::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// Constraint violations raised by the store become the matching domain
/// error; anything else stays a storage failure.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        let mapped = match &err {
            StoreError::UniqueViolation { table, key } => EntityKind::from_table(table)
                .map(|entity| ServiceError::DuplicateKey {
                    entity,
                    value: key.clone(),
                }),
            StoreError::ForeignKeyViolation { table, id, .. } => EntityKind::from_table(table)
                .map(|entity| ServiceError::ReferenceNotFound { entity, id: *id }),
            StoreError::RestrictViolation { table, id, .. } => EntityKind::from_table(table)
                .map(|entity| ServiceError::InUse { entity, id: *id }),
            StoreError::NotFound { table, id } => EntityKind::from_table(table)
                .map(|entity| ServiceError::NotFound { entity, id: *id }),
            StoreError::LockPoisoned(_) | StoreError::Serde(_) => None,
        };
        mapped.unwrap_or(ServiceError::Store(err))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err)
    }
}

impl ServiceError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. } => 404,
            ServiceError::ReferenceNotFound { .. } => 404,
            ServiceError::DuplicateKey { .. } => 409,
            ServiceError::InUse { .. } => 409,
            ServiceError::Validation(_) => 422,
            ServiceError::Store(_) => 500,
        }
    }

    /// Stable machine-readable error name for the response envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound {
                entity: EntityKind::Model,
                ..
            }
            | ServiceError::ReferenceNotFound {
                entity: EntityKind::Model,
                ..
            } => "ModelNotFound",
            ServiceError::NotFound {
                entity: EntityKind::Truck,
                ..
            }
            | ServiceError::ReferenceNotFound {
                entity: EntityKind::Truck,
                ..
            } => "TruckNotFound",
            ServiceError::DuplicateKey {
                entity: EntityKind::Model,
                ..
            } => "DuplicateModelName",
            ServiceError::DuplicateKey {
                entity: EntityKind::Truck,
                ..
            } => "DuplicateBoardNumber",
            ServiceError::InUse {
                entity: EntityKind::Model,
                ..
            } => "ModelInUse",
            ServiceError::InUse {
                entity: EntityKind::Truck,
                ..
            } => "TruckInUse",
            ServiceError::Validation(_) => "ValidationError",
            ServiceError::Store(_) => "InternalServerError",
        }
    }

    /// True for failures outside the domain taxonomy.
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Store(_))
    }
}
