use std::fmt;

use thiserror::Error;

/// Record kinds named by not-found and reference errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Seller,
    Sale,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "customer",
            EntityKind::Seller => "seller",
            EntityKind::Sale => "sale",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    /// The record addressed by the operation does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),
    /// A sale points at a seller or customer that does not exist.
    #[error("referenced {0} not found")]
    ReferenceNotFound(EntityKind),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind) -> Self { Self::NotFound(kind) }

    pub fn db(e: impl fmt::Display) -> Self { Self::Db(e.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::ReferenceNotFound(EntityKind::Seller) => 1011,
            ServiceError::ReferenceNotFound(EntityKind::Customer) => 1012,
            ServiceError::ReferenceNotFound(EntityKind::Sale) => 1013,
            ServiceError::Model(_) => 1100,
            ServiceError::Db(_) => 1200,
        }
    }
}
