use arrrg::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use parkade::{ServerConfig, ServerOptions, create_router, sql};

const HELP_TEXT: &str = r#"parkingd - Parking occupancy daemon

USAGE:
    parkingd [OPTIONS]

OPTIONS:
    --database-url <URL>  SQLite database URL [default: $DATABASE_URL or sqlite:parking.db]
    --host <HOST>         Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>         Port to bind the HTTP server [default: 8080]
    --verbose             Enable debug logging (RUST_LOG takes precedence)

DESCRIPTION:
    Runs the parking occupancy HTTP API. Pending migrations are applied on
    startup. The server supports graceful shutdown via Ctrl+C.

API ENDPOINTS:
    GET    /health                  Liveness probe
    GET    /clients                 List all clients
    POST   /clients                 Create a client
    POST   /clients/add-card        Attach a credit card to a client
    GET    /clients/{id}            Get a client
    GET    /parkings                List all parkings
    POST   /parkings                Create a parking
    GET    /parkings/{id}           Get a parking
    GET    /client_parkings         List all client parkings
    POST   /client_parkings         Enter a parking
    DELETE /client_parkings         Exit a parking
    GET    /client_parkings/{id}    Get a client parking"#;

fn init_tracing(config: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server gracefully");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = ServerOptions::from_command_line("USAGE: parkingd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::from_options(options);
    init_tracing(&config);

    tracing::debug!(
        database_url = %config.database_url,
        bind_address = %config.bind_address(),
        "parkingd starting"
    );

    let pool = sql::connect(&config.database_url)
        .await
        .map_err(|e| format!("Failed to open {}: {}", config.database_url, e))?;
    sql::migrate(&pool)
        .await
        .map_err(|e| format!("Failed to run migrations: {}", e))?;

    let app = create_router(pool.clone());

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("parkingd stopped");

    Ok(())
}
