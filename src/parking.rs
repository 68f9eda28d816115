//! # Parkings
//!
//! A parking is a lot at a unique address with a fixed number of places.  The number of
//! available places and the `opened` flag are owned by the occupancy transitions once
//! the parking exists.

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api_error::ApiError;
use crate::errors::DataStoreError;
use crate::{sql, validate};

/////////////////////////////////////////////// Parking ///////////////////////////////////////////////

/// A stored parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Parking {
    /// Generated identifier.
    pub id: i64,
    /// Street address, unique across parkings.
    pub address: String,
    /// False once an entrance has used up the last place.
    pub opened: bool,
    /// Total capacity.
    pub count_places: i64,
    /// Places currently free.
    pub count_available_places: i64,
}

/// A validated parking that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParking {
    /// Street address.
    pub address: String,
    /// Initial state of the `opened` flag.
    pub opened: bool,
    /// Total capacity, at least one.
    pub count_places: i64,
    /// Initially free places, between zero and `count_places`.
    pub count_available_places: i64,
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////////

/// Request body for `POST /parkings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateParkingRequest {
    /// Street address (required).
    pub address: Option<String>,
    /// Total capacity (required).
    pub count_places: Option<i64>,
    /// Initially free places (required).
    pub count_available_places: Option<i64>,
    /// Defaults to open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened: Option<bool>,
}

async fn list_parkings(State(pool): State<SqlitePool>) -> Result<Json<Vec<Parking>>, ApiError> {
    let mut tx = pool.begin().await?;
    let parkings = sql::parking::list(&mut tx).await?;
    tx.commit().await?;

    if parkings.is_empty() {
        return Err(ApiError::NotFound("Parkings not found".to_string()));
    }
    Ok(Json(parkings))
}

async fn get_parking(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Parking>, ApiError> {
    let Path(id) = id?;
    let mut tx = pool.begin().await?;
    let parking = sql::parking::get(&mut tx, id).await.map_err(|e| match e {
        DataStoreError::NotFound => {
            ApiError::NotFound("Parking with this id not found".to_string())
        }
        e => ApiError::Store(e),
    })?;
    tx.commit().await?;
    Ok(Json(parking))
}

async fn create_parking(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateParkingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Parking>), ApiError> {
    let Json(request) = payload?;
    let new_parking = validate::validate_parking(&request)?;

    let mut tx = pool.begin().await?;
    let parking = sql::parking::create(&mut tx, &new_parking)
        .await
        .map_err(|e| match e {
            DataStoreError::AlreadyExists => ApiError::DuplicateAddress,
            e => ApiError::Store(e),
        })?;
    tx.commit().await?;

    tracing::info!(parking_id = parking.id, address = %parking.address, "created parking");
    Ok((StatusCode::CREATED, Json(parking)))
}

////////////////////////////////////////////// Router //////////////////////////////////////////////////

/// Creates the HTTP router for parking endpoints.
pub fn create_parking_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/parkings", get(list_parkings).post(create_parking))
        .route("/parkings/:id", get(get_parking))
        .with_state(pool)
}
