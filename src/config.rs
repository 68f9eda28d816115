//! Configuration for the parkade daemon.
//!
//! Options come from the command line first, then the environment, then built-in
//! defaults.

use arrrg_derive::CommandLine;

/// Database used when neither `--database-url` nor `DATABASE_URL` is given.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:parking.db";
/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Command-line options accepted by `parkingd`.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ServerOptions {
    /// SQLite database URL.
    #[arrrg(optional, "SQLite database URL (falls back to DATABASE_URL)")]
    pub database_url: Option<String>,
    /// Bind host.
    #[arrrg(optional, "Host to bind the HTTP server")]
    pub host: Option<String>,
    /// Bind port.
    #[arrrg(optional, "Port to bind the HTTP server")]
    pub port: Option<u16>,
    /// Verbose logging.
    #[arrrg(flag, "Enable verbose logging")]
    pub verbose: bool,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Verbose logging.
    pub verbose: bool,
}

impl ServerConfig {
    /// Resolves options against the process environment.
    pub fn from_options(options: ServerOptions) -> Self {
        Self::resolve(options, std::env::var("DATABASE_URL").ok())
    }

    /// Resolves options against an explicit `DATABASE_URL` value.
    pub fn resolve(options: ServerOptions, env_database_url: Option<String>) -> Self {
        Self {
            database_url: options
                .database_url
                .or(env_database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: options.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: options.port.unwrap_or(DEFAULT_PORT),
            verbose: options.verbose,
        }
    }

    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::resolve(ServerOptions::default(), None);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn environment_beats_default() {
        let config = ServerConfig::resolve(
            ServerOptions::default(),
            Some("sqlite:/tmp/env.db".to_string()),
        );
        assert_eq!(config.database_url, "sqlite:/tmp/env.db");
    }

    #[test]
    fn command_line_beats_environment() {
        let options = ServerOptions {
            database_url: Some("sqlite:cli.db".to_string()),
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            verbose: true,
        };
        let config = ServerConfig::resolve(options, Some("sqlite:env.db".to_string()));
        assert_eq!(config.database_url, "sqlite:cli.db");
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.log_filter(), "debug");
    }
}
