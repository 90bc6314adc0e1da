//! Business logic services.

pub mod schemas;

pub use schemas::{SchemaService, ServiceError};
