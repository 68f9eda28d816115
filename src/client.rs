//! # Clients
//!
//! A client is a car owner who may park in any parking.  Clients are created once and
//! afterwards only their credit card changes; a client without a card cannot leave a
//! parking.

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api_error::ApiError;
use crate::errors::DataStoreError;
use crate::{sql, validate};

/////////////////////////////////////////////// Client ////////////////////////////////////////////////

/// A stored client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    /// Generated identifier.
    pub id: i64,
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Card used to pay on exit; `None` means no card on file.
    pub credit_card: Option<String>,
    /// Registration plate, at most ten characters.
    pub car_number: Option<String>,
}

impl Client {
    /// Returns true when the client can pay for parking.
    pub fn has_credit_card(&self) -> bool {
        self.credit_card.is_some()
    }
}

/// A validated client that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Optional card on file.
    pub credit_card: Option<String>,
    /// Optional registration plate.
    pub car_number: Option<String>,
}

/// A validated credit card change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUpdate {
    /// Client whose card changes.
    pub client_id: i64,
    /// The new card.
    pub credit_card: String,
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////////

/// Request body for `POST /clients`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateClientRequest {
    /// First name (required).
    pub name: Option<String>,
    /// Family name (required).
    pub surname: Option<String>,
    /// Card on file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<String>,
    /// Registration plate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
}

/// Request body for `POST /clients/add-card`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCardRequest {
    /// Client whose card is set (required).
    pub client_id: Option<i64>,
    /// The card (required).
    pub credit_card: Option<String>,
}

async fn list_clients(State(pool): State<SqlitePool>) -> Result<Json<Vec<Client>>, ApiError> {
    let mut tx = pool.begin().await?;
    let clients = sql::client::list(&mut tx).await?;
    tx.commit().await?;

    if clients.is_empty() {
        return Err(ApiError::NotFound("Clients not found".to_string()));
    }
    Ok(Json(clients))
}

async fn get_client(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Client>, ApiError> {
    let Path(id) = id?;
    let mut tx = pool.begin().await?;
    let client = sql::client::get(&mut tx, id).await.map_err(|e| match e {
        DataStoreError::NotFound => {
            ApiError::NotFound("Client with this id not found".to_string())
        }
        e => ApiError::Store(e),
    })?;
    tx.commit().await?;
    Ok(Json(client))
}

async fn create_client(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let Json(request) = payload?;
    let new_client = validate::validate_client(&request)?;

    let mut tx = pool.begin().await?;
    let client = sql::client::create(&mut tx, &new_client).await?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, "created client");
    Ok((StatusCode::CREATED, Json(client)))
}

async fn add_card(
    State(pool): State<SqlitePool>,
    payload: Result<Json<AddCardRequest>, JsonRejection>,
) -> Result<Json<Client>, ApiError> {
    let Json(request) = payload?;
    let update = validate::validate_add_card(&request)?;

    let mut tx = pool.begin().await?;
    let client = sql::client::set_credit_card(&mut tx, update.client_id, &update.credit_card)
        .await
        .map_err(|e| match e {
            DataStoreError::NotFound => {
                ApiError::NotFound("There is no client with this id".to_string())
            }
            e => ApiError::Store(e),
        })?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, "credit card set");
    Ok(Json(client))
}

////////////////////////////////////////////// Router //////////////////////////////////////////////////

/// Creates the HTTP router for client endpoints.
pub fn create_client_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/add-card", post(add_card))
        .route("/clients/:id", get(get_client))
        .with_state(pool)
}
