//! # Parking Command Handler

use crate::{
    CreateParkingRequest, Parking, cli_utils,
    commands::shared::{
        dispatch_command, parse_arg_or_exit, parse_id_or_exit, validate_args_count_or_exit,
    },
    http_utils,
};

const PARKING_USAGE: &str = "Usage: parkctl parking <create|list|get> [args...]";

/// Handles all parking-related commands.
pub async fn handle_parking_command(args: &[String], client: &http_utils::ParkadeClient) {
    dispatch_command!("parking", PARKING_USAGE, args, client, {
        "create" => handle_parking_create,
        "list" => handle_parking_list,
        "get" => handle_parking_get,
    });
}

/// Handles `parking create <address> <count-places> [count-available-places]`.
///
/// Available places default to the full capacity.
async fn handle_parking_create(args: &[String], client: &http_utils::ParkadeClient) {
    let usage = "Usage: parkctl parking create <address> <count-places> [count-available-places]";
    validate_args_count_or_exit(args, 3, 4, "create", usage);

    let count_places: i64 = parse_arg_or_exit(&args[2], "count-places");
    let count_available_places: i64 = match args.get(3) {
        Some(value) => parse_arg_or_exit(value, "count-available-places"),
        None => count_places,
    };
    let request = CreateParkingRequest {
        address: Some(args[1].clone()),
        count_places: Some(count_places),
        count_available_places: Some(count_available_places),
        opened: None,
    };

    let created = http_utils::execute_or_exit(
        || client.post::<CreateParkingRequest, Parking>("parkings", &request),
        "Failed to create parking",
    )
    .await;

    println!("Created parking: {}", created.id);
}

/// Handles `parking list`.
async fn handle_parking_list(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: parkctl parking list");

    let parkings = http_utils::execute_or_exit(
        || client.get::<Vec<Parking>>("parkings"),
        "Failed to list parkings",
    )
    .await;

    cli_utils::print_json_or_exit(&parkings, "parkings");
}

/// Handles `parking get <parking-id>`.
async fn handle_parking_get(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: parkctl parking get <parking-id>");
    let id = parse_id_or_exit(&args[1], "parking id");
    let path = format!("parkings/{}", id);

    let parking =
        http_utils::execute_or_exit(|| client.get::<Parking>(&path), "Failed to get parking").await;

    cli_utils::print_json_or_exit(&parking, "parking");
}
