//! Command-line and environment configuration for the server.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use time::Duration;

/// The REST API server for the expense tracker.
///
/// Every option can also be set with the environment variable shown in its help text.
#[derive(Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    pub db_path: String,

    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// The secret used to sign bearer tokens.
    #[arg(long, env = "SECRET", hide_env_values = true, value_parser = parse_secret)]
    pub secret: String,

    /// How many hours an issued bearer token stays valid.
    #[arg(
        long,
        env = "TOKEN_DURATION_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub token_duration_hours: u32,
}

impl Config {
    /// The address the server listens on.
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// How long an issued bearer token stays valid.
    pub fn token_duration(&self) -> Duration {
        Duration::hours(i64::from(self.token_duration_hours))
    }
}

fn parse_secret(secret: &str) -> Result<String, String> {
    if secret.trim().is_empty() {
        return Err("the secret cannot be empty".to_owned());
    }

    Ok(secret.to_owned())
}
