use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use parkade::{
    cli_utils,
    commands::{
        handle_client_command, handle_enter_command, handle_exit_command, handle_pairing_command,
        handle_parking_command,
    },
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the parkingd server")]
    base_url: String,
}

const USAGE: &str = r#"Usage: parkctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the parkingd server (default: http://localhost:8080)

Commands:
  client create <name> <surname> [credit-card] [car-number]   Create a client
  client list                                                 List all clients
  client get <client-id>                                      Get a client by ID
  client add-card <client-id> <credit-card>                   Attach a credit card
  parking create <address> <count-places> [available]         Create a parking
  parking list                                                List all parkings
  parking get <parking-id>                                    Get a parking by ID
  enter <client-id> <parking-id>                              Park a client
  exit <client-id> <parking-id>                               Release a client's place
  pairing list                                                List all client parkings
  pairing get <pairing-id>                                    Get a client parking by ID"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: parkctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8080".to_string()
    } else {
        options.base_url
    };

    let client = http_utils::ParkadeClient::new(base_url);

    match free[0].as_str() {
        "client" => {
            handle_client_command(&free[1..], &client).await;
        }
        "parking" => {
            handle_parking_command(&free[1..], &client).await;
        }
        "enter" => {
            handle_enter_command(&free[1..], &client).await;
        }
        "exit" => {
            handle_exit_command(&free[1..], &client).await;
        }
        "pairing" => {
            handle_pairing_command(&free[1..], &client).await;
        }
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: client, parking, enter, exit, pairing",
                free[0]
            ));
        }
    }

    Ok(())
}
