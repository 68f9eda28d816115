//! # Parkade: Parking-Lot Occupancy Service
//!
//! Parkade tracks clients, parking lots and the pairing between the two. A client
//! entering a parking lot takes one of its available places; leaving gives the place
//! back, provided the client has a payment method on file.
//!
//! The crate provides:
//!
//! - **Resources**: clients, parkings and client parkings, each with its own model,
//!   request payloads and axum router
//! - **Validation**: pure field validators that collect every problem with a payload
//!   before anything touches the database
//! - **Occupancy rules**: entrance and exit as single transactional units over the
//!   pairing row and the parking's capacity counter
//! - **Persistence**: SQLite through sqlx with embedded migrations
//! - **CLI**: `parkingd` serves the API and `parkctl` talks to it
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (axum routers)           │
//! ├─────────────────────────────────────────┤
//! │ Validation (validate_*)                 │
//! ├─────────────────────────────────────────┤
//! │ Occupancy rules (enter / exit)          │
//! ├─────────────────────────────────────────┤
//! │ SQL access (sql::client, sql::parking)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Validating a parking payload
//!
//! ```rust
//! # use parkade::{CreateParkingRequest, SCHEMA_FIELD, validate_parking};
//! let request = CreateParkingRequest {
//!     address: Some("1 Main St".to_string()),
//!     count_places: Some(5),
//!     count_available_places: Some(6),
//!     opened: None,
//! };
//! let errors = validate_parking(&request).unwrap_err();
//! assert!(errors.messages(SCHEMA_FIELD).is_some());
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = parkade::sql::connect("sqlite:parking.db").await?;
//! parkade::sql::migrate(&pool).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, parkade::create_router(pool)).await?;
//! # Ok(())
//! # }
//! ```

mod api_error;
mod client;
mod client_parking;
mod config;
mod errors;
mod parking;
mod router;
mod validate;

/// Entrance and exit rules, run inside a caller-owned transaction.
pub mod occupancy;

/// SQLite connection setup, migrations and per-table queries.
pub mod sql;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// Command handlers for the parkctl CLI, one submodule per resource.
pub mod commands;

/// HTTP client used by parkctl to talk to a running parkingd.
pub mod http_utils;

pub use api_error::ApiError;
pub use client::{
    AddCardRequest, CardUpdate, Client, CreateClientRequest, NewClient, create_client_router,
};
pub use client_parking::{
    ClientParking, ClientParkingRequest, PairingKey, create_client_parking_router,
};
pub use config::{DEFAULT_DATABASE_URL, DEFAULT_HOST, DEFAULT_PORT, ServerConfig, ServerOptions};
pub use errors::DataStoreError;
pub use occupancy::OccupancyError;
pub use parking::{CreateParkingRequest, NewParking, Parking, create_parking_router};
pub use router::create_router;
pub use validate::{
    CAR_NUMBER_MAX_LEN, SCHEMA_FIELD, ValidationErrors, validate_add_card, validate_client,
    validate_pairing, validate_parking,
};
