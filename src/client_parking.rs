//! # Client Parkings
//!
//! A client parking (pairing) links one client to one parking.  The row is created on
//! the first entrance and reused on every later visit, so it only ever records the most
//! recent `time_in`/`time_out`.
//!
//! Entrance is `POST /client_parkings` and exit is `DELETE /client_parkings`; both take
//! `{"client_id": .., "parking_id": ..}` and answer `201` with the pairing.

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api_error::ApiError;
use crate::errors::DataStoreError;
use crate::{occupancy, sql, validate};

/////////////////////////////////////////// ClientParking /////////////////////////////////////////////

/// A stored pairing between a client and a parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientParking {
    /// Generated identifier.
    pub id: i64,
    /// The client.
    pub client_id: i64,
    /// The parking.
    pub parking_id: i64,
    /// Start of the most recent visit.
    pub time_in: Option<DateTime<Utc>>,
    /// End of the most recent visit; `None` while the client is inside.
    pub time_out: Option<DateTime<Utc>>,
}

impl ClientParking {
    /// Returns true while the client is inside the parking.
    pub fn is_present(&self) -> bool {
        self.time_out.is_none()
    }
}

/// A validated `(client_id, parking_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingKey {
    /// The client.
    pub client_id: i64,
    /// The parking.
    pub parking_id: i64,
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////////

/// Request body for entrance and exit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientParkingRequest {
    /// The client (required).
    pub client_id: Option<i64>,
    /// The parking (required).
    pub parking_id: Option<i64>,
}

impl ClientParkingRequest {
    /// Builds a request for the given pair.
    pub fn new(client_id: i64, parking_id: i64) -> Self {
        Self {
            client_id: Some(client_id),
            parking_id: Some(parking_id),
        }
    }
}

async fn enter_parking(
    State(pool): State<SqlitePool>,
    payload: Result<Json<ClientParkingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientParking>), ApiError> {
    let Json(request) = payload?;
    let key = validate::validate_pairing(&request)?;

    let mut tx = sql::begin_write(&pool).await?;
    match occupancy::enter(&mut tx, key.client_id, key.parking_id).await {
        Ok(pairing) => {
            tx.commit().await?;
            Ok((StatusCode::CREATED, Json(pairing)))
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}

async fn exit_parking(
    State(pool): State<SqlitePool>,
    payload: Result<Json<ClientParkingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientParking>), ApiError> {
    let Json(request) = payload?;
    let key = validate::validate_pairing(&request)?;

    let mut tx = sql::begin_write(&pool).await?;
    match occupancy::exit(&mut tx, key.client_id, key.parking_id).await {
        Ok(pairing) => {
            tx.commit().await?;
            Ok((StatusCode::CREATED, Json(pairing)))
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}

async fn list_client_parkings(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<ClientParking>>, ApiError> {
    let mut tx = pool.begin().await?;
    let pairings = sql::client_parking::list(&mut tx).await?;
    tx.commit().await?;

    if pairings.is_empty() {
        return Err(ApiError::NotFound("Client parkings not found".to_string()));
    }
    Ok(Json(pairings))
}

async fn get_client_parking(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ClientParking>, ApiError> {
    let Path(id) = id?;
    let mut tx = pool.begin().await?;
    let pairing = sql::client_parking::get(&mut tx, id)
        .await
        .map_err(|e| match e {
            DataStoreError::NotFound => {
                ApiError::NotFound("Client parking with this id not found".to_string())
            }
            e => ApiError::Store(e),
        })?;
    tx.commit().await?;
    Ok(Json(pairing))
}

////////////////////////////////////////////// Router //////////////////////////////////////////////////

/// Creates the HTTP router for entrance, exit and pairing lookups.
pub fn create_client_parking_router(pool: SqlitePool) -> Router {
    Router::new()
        .route(
            "/client_parkings",
            get(list_client_parkings)
                .post(enter_parking)
                .delete(exit_parking),
        )
        .route("/client_parkings/:id", get(get_client_parking))
        .with_state(pool)
}
