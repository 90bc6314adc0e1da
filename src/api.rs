//! Public API surface for the schemas backend.
//!
//! This file consolidates the identifier newtypes and re-exports the domain
//! model types. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::models::AmrParameters;
pub use crate::models::Schema;
pub use crate::models::TransportationCost;
pub use crate::models::WorkStation;

use serde::{Deserialize, Serialize};

/// Schema identifier (store-assigned primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaId(pub i64);

/// Owner identifier resolved from the authentication service.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl SchemaId {
    pub fn new(value: i64) -> Self {
        SchemaId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SchemaId> for i64 {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
