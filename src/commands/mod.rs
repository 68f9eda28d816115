//! # Command Handlers
//!
//! Command handlers for the parkctl CLI application, one submodule per resource.
//!
//! ## Structure
//!
//! - `client` - Client commands (create, list, get, add-card)
//! - `parking` - Parking commands (create, list, get)
//! - `client_parking` - Entrance, exit and pairing lookups
//! - `shared` - Argument validation and dispatch helpers

pub mod client;
pub mod client_parking;
pub mod parking;
pub mod shared;

pub use client::handle_client_command;
pub use client_parking::{handle_enter_command, handle_exit_command, handle_pairing_command};
pub use parking::handle_parking_command;
