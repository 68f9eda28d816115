use axum::Router;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::client::create_client_router;
use crate::client_parking::create_client_parking_router;
use crate::parking::create_parking_router;

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Builds the complete HTTP surface over one connection pool.
pub fn create_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_client_router(pool.clone()))
        .merge(create_parking_router(pool.clone()))
        .merge(create_client_parking_router(pool))
}
