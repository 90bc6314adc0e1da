//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};

use super::dto::{HealthResponse, SchemaListResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Schema, SchemaId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Extract the bearer token from the `Authorization` header.
///
/// A missing or malformed header is a client error, distinct from a token
/// the authentication service rejects.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("User token is required".to_string()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the storage
/// backend is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.service.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Schema CRUD
// =============================================================================

/// GET /v1/schemas
///
/// List all schemas owned by the caller.
pub async fn list_schemas(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<SchemaListResponse> {
    let token = bearer_token(&headers)?;
    let schemas = state.service.list_schemas(token).await?;
    let total = schemas.len();

    Ok(Json(SchemaListResponse { schemas, total }))
}

/// POST /v1/schemas
///
/// Create a new empty schema owned by the caller. The store assigns the id.
pub async fn create_schema(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Schema> {
    let token = bearer_token(&headers)?;
    let schema = state.service.create_schema(token).await?;

    Ok(Json(schema))
}

/// PUT /v1/schemas/{schema_id}
///
/// Replace the full schema document. The path id wins over any id carried
/// in the body.
pub async fn update_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<i64>,
    headers: HeaderMap,
    Json(mut schema): Json<Schema>,
) -> HandlerResult<Schema> {
    let token = bearer_token(&headers)?;
    schema.id = Some(SchemaId::new(schema_id));
    let updated = state.service.update_schema(schema, token).await?;

    Ok(Json(updated))
}

/// GET /v1/schemas/{schema_id}
///
/// Fetch a schema by id; only its owner may read it.
pub async fn get_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<i64>,
    headers: HeaderMap,
) -> HandlerResult<Schema> {
    let token = bearer_token(&headers)?;
    let schema = state
        .service
        .get_schema(SchemaId::new(schema_id), token)
        .await?;

    Ok(Json(schema))
}
