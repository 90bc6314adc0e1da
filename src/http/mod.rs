//! HTTP server module for the schemas backend.
//!
//! An axum-based REST API over the service layer. Handlers parse requests,
//! extract the bearer token, and delegate to [`crate::services::SchemaService`];
//! all business rules (authentication, ownership, notification) live below
//! this layer.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
