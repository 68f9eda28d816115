//! # Entrance, Exit and Pairing Command Handlers
//!
//! `enter` and `exit` move a client in and out of a parking; `pairing` looks up the
//! client parking records those moves leave behind.

use crate::{
    ClientParking, ClientParkingRequest, cli_utils,
    commands::shared::{dispatch_command, parse_id_or_exit, validate_args_count_or_exit},
    http_utils,
};

const PAIRING_USAGE: &str = "Usage: parkctl pairing <list|get> [args...]";

fn pairing_request_or_exit(args: &[String], command: &str) -> ClientParkingRequest {
    validate_args_count_or_exit(
        args,
        2,
        2,
        command,
        &format!("Usage: parkctl {} <client-id> <parking-id>", command),
    );
    ClientParkingRequest::new(
        parse_id_or_exit(&args[0], "client id"),
        parse_id_or_exit(&args[1], "parking id"),
    )
}

/// Handles `enter <client-id> <parking-id>`.
pub async fn handle_enter_command(args: &[String], client: &http_utils::ParkadeClient) {
    let request = pairing_request_or_exit(args, "enter");

    let pairing = http_utils::execute_or_exit(
        || client.post::<ClientParkingRequest, ClientParking>("client_parkings", &request),
        "Failed to enter parking",
    )
    .await;

    cli_utils::print_json_or_exit(&pairing, "client parking");
}

/// Handles `exit <client-id> <parking-id>`.
pub async fn handle_exit_command(args: &[String], client: &http_utils::ParkadeClient) {
    let request = pairing_request_or_exit(args, "exit");

    let pairing = http_utils::execute_or_exit(
        || client.delete::<ClientParkingRequest, ClientParking>("client_parkings", &request),
        "Failed to exit parking",
    )
    .await;

    cli_utils::print_json_or_exit(&pairing, "client parking");
}

/// Handles `pairing list` and `pairing get <pairing-id>`.
pub async fn handle_pairing_command(args: &[String], client: &http_utils::ParkadeClient) {
    dispatch_command!("pairing", PAIRING_USAGE, args, client, {
        "list" => handle_pairing_list,
        "get" => handle_pairing_get,
    });
}

/// Handles `pairing list`.
async fn handle_pairing_list(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: parkctl pairing list");

    let pairings = http_utils::execute_or_exit(
        || client.get::<Vec<ClientParking>>("client_parkings"),
        "Failed to list client parkings",
    )
    .await;

    cli_utils::print_json_or_exit(&pairings, "client parkings");
}

/// Handles `pairing get <pairing-id>`.
async fn handle_pairing_get(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: parkctl pairing get <pairing-id>");
    let id = parse_id_or_exit(&args[1], "pairing id");
    let path = format!("client_parkings/{}", id);

    let pairing = http_utils::execute_or_exit(
        || client.get::<ClientParking>(&path),
        "Failed to get client parking",
    )
    .await;

    cli_utils::print_json_or_exit(&pairing, "client parking");
}
