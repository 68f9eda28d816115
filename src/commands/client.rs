//! # Client Command Handler
//!
//! Handles client-related CLI commands: creation, listing, lookup and attaching a
//! credit card.

use crate::{
    AddCardRequest, Client, CreateClientRequest, cli_utils,
    commands::shared::{dispatch_command, parse_id_or_exit, validate_args_count_or_exit},
    http_utils,
};

const CLIENT_USAGE: &str = "Usage: parkctl client <create|list|get|add-card> [args...]";

/// Handles all client-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
pub async fn handle_client_command(args: &[String], client: &http_utils::ParkadeClient) {
    dispatch_command!("client", CLIENT_USAGE, args, client, {
        "create" => handle_client_create,
        "list" => handle_client_list,
        "get" => handle_client_get,
        "add-card" => handle_client_add_card,
    });
}

/// Handles `client create <name> <surname> [credit-card] [car-number]`.
async fn handle_client_create(args: &[String], client: &http_utils::ParkadeClient) {
    let usage = "Usage: parkctl client create <name> <surname> [credit-card] [car-number]";
    validate_args_count_or_exit(args, 3, 5, "create", usage);

    let request = CreateClientRequest {
        name: Some(args[1].clone()),
        surname: Some(args[2].clone()),
        credit_card: args.get(3).filter(|card| !card.is_empty()).cloned(),
        car_number: args.get(4).cloned(),
    };

    let created = http_utils::execute_or_exit(
        || client.post::<CreateClientRequest, Client>("clients", &request),
        "Failed to create client",
    )
    .await;

    println!("Created client: {}", created.id);
}

/// Handles `client list`.
async fn handle_client_list(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: parkctl client list");

    let clients = http_utils::execute_or_exit(
        || client.get::<Vec<Client>>("clients"),
        "Failed to list clients",
    )
    .await;

    cli_utils::print_json_or_exit(&clients, "clients");
}

/// Handles `client get <client-id>`.
async fn handle_client_get(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: parkctl client get <client-id>");
    let id = parse_id_or_exit(&args[1], "client id");
    let path = format!("clients/{}", id);

    let found = http_utils::execute_or_exit(|| client.get::<Client>(&path), "Failed to get client")
        .await;

    cli_utils::print_json_or_exit(&found, "client");
}

/// Handles `client add-card <client-id> <credit-card>`.
async fn handle_client_add_card(args: &[String], client: &http_utils::ParkadeClient) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "add-card",
        "Usage: parkctl client add-card <client-id> <credit-card>",
    );
    let request = AddCardRequest {
        client_id: Some(parse_id_or_exit(&args[1], "client id")),
        credit_card: Some(args[2].clone()),
    };

    let updated = http_utils::execute_or_exit(
        || client.post::<AddCardRequest, Client>("clients/add-card", &request),
        "Failed to set credit card",
    )
    .await;

    println!("Credit card set for client: {}", updated.id);
}
