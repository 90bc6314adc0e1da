//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        .route(
            "/schemas",
            get(handlers::list_schemas).post(handlers::create_schema),
        )
        .route(
            "/schemas/{schema_id}",
            get(handlers::get_schema).put(handlers::update_schema),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::UserId;
    use crate::auth::{StubAuthenticationService, STUB_VALID_TOKEN};
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::SchemaRepository;
    use crate::services::SchemaService;
    use crate::solutions::StubSolutionsService;

    fn test_state() -> (AppState, Arc<LocalRepository>) {
        let repo = Arc::new(LocalRepository::new());
        let service = SchemaService::new(
            repo.clone(),
            Arc::new(StubAuthenticationService::new()),
            Arc::new(StubSolutionsService::new()),
        );
        (AppState::new(Arc::new(service)), repo)
    }

    fn authorized(request: Request<Body>) -> Request<Body> {
        let (mut parts, body) = request.into_parts();
        parts.headers.insert(
            "authorization",
            format!("Bearer {}", STUB_VALID_TOKEN).parse().unwrap(),
        );
        Request::from_parts(parts, body)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_creation() {
        let (state, _repo) = test_state();
        let _router = create_router(state);
    }

    #[tokio::test]
    async fn health_reports_connected_backend() {
        let (state, _repo) = test_state();
        let response = create_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "connected");
    }

    #[tokio::test]
    async fn missing_token_is_bad_request() {
        let (state, repo) = test_state();
        let response = create_router(state)
            .oneshot(Request::post("/v1/schemas").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "User token is required");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized_and_mutates_nothing() {
        let (state, repo) = test_state();
        let response = create_router(state)
            .oneshot(
                Request::post("/v1/schemas")
                    .header("authorization", "Bearer wrong_token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_new_document() {
        let (state, _repo) = test_state();
        let response = create_router(state)
            .oneshot(authorized(
                Request::post("/v1/schemas").body(Body::empty()).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], 1);
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["workstations"], serde_json::json!([]));
        assert!(json["amr_parameters"].is_null());
    }

    #[tokio::test]
    async fn list_returns_only_the_callers_schemas() {
        let (state, repo) = test_state();
        repo.create_schema(UserId::new(1)).await.unwrap();
        repo.create_schema(UserId::new(7)).await.unwrap();

        let response = create_router(state)
            .oneshot(authorized(
                Request::get("/v1/schemas").body(Body::empty()).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["schemas"][0]["user_id"], 1);
    }

    #[tokio::test]
    async fn get_missing_schema_is_not_found() {
        let (state, _repo) = test_state();
        let response = create_router(state)
            .oneshot(authorized(
                Request::get("/v1/schemas/99").body(Body::empty()).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_of_foreign_schema_is_forbidden() {
        let (state, repo) = test_state();
        repo.create_schema(UserId::new(7)).await.unwrap();

        let body = serde_json::json!({
            "id": 1,
            "user_id": 7,
            "workstations": [],
            "transportation_costs": [],
            "amr_parameters": null
        });
        let response = create_router(state)
            .oneshot(authorized(
                Request::put("/v1/schemas/1")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Store unchanged: the schema still belongs to user 7
        let owned = repo
            .schema_belongs_to_user(crate::api::SchemaId::new(1), UserId::new(7))
            .await
            .unwrap();
        assert!(owned);
    }

    #[tokio::test]
    async fn update_stamps_the_authenticated_owner() {
        let (state, repo) = test_state();
        repo.create_schema(UserId::new(1)).await.unwrap();

        // The payload claims a different owner; the stamp wins.
        let body = serde_json::json!({
            "id": 1,
            "user_id": 999,
            "workstations": [
                {"name": "assembly", "demand": 3.0, "x": 0.0, "y": 4.0}
            ],
            "transportation_costs": [],
            "amr_parameters": {"quantity": 2, "capacity": 50.0}
        });
        let response = create_router(state)
            .oneshot(authorized(
                Request::put("/v1/schemas/1")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["workstations"][0]["name"], "assembly");
        assert_eq!(json["amr_parameters"]["quantity"], 2);
    }

    #[tokio::test]
    async fn path_id_wins_over_body_id() {
        let (state, repo) = test_state();
        repo.create_schema(UserId::new(1)).await.unwrap();

        let body = serde_json::json!({
            "id": 42,
            "user_id": 1,
            "workstations": [],
            "transportation_costs": [],
            "amr_parameters": null
        });
        let response = create_router(state)
            .oneshot(authorized(
                Request::put("/v1/schemas/1")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], 1);
    }
}
