//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use device_link::BrokerConfig;

/// Console web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// MQTT broker connection settings for toy dispatch.
    pub broker: BrokerConfig,
    /// Emails allowed onto the admin surface. Empty means no admin access.
    pub admin_emails: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CONSOLE_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:cheeko.db?mode=rwc` |
    /// | `MQTT_HOST` | Broker hostname | `127.0.0.1` |
    /// | `MQTT_PORT` | Broker port | `1883` |
    /// | `MQTT_USERNAME` | Broker username | (none) |
    /// | `MQTT_PASSWORD` | Broker password | (none) |
    /// | `MQTT_CLIENT_PREFIX` | Client id prefix | `cheeko_web` |
    /// | `ADMIN_EMAILS` | Comma-separated admin allowlist | (empty) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CONSOLE_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:cheeko.db?mode=rwc".to_string());

        let mqtt_host = env::var("MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let mqtt_port = env::var("MQTT_PORT")
            .unwrap_or_else(|_| "1883".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let mut broker = BrokerConfig::new(mqtt_host, mqtt_port);
        if let Ok(prefix) = env::var("MQTT_CLIENT_PREFIX") {
            broker.client_prefix = prefix;
        }
        if let (Ok(username), Ok(password)) = (env::var("MQTT_USERNAME"), env::var("MQTT_PASSWORD"))
        {
            broker = broker.with_credentials(username, password);
        }

        let admin_emails = env::var("ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Ok(Self {
            addr,
            database_url,
            broker,
            admin_emails,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CONSOLE_ADDR format")]
    InvalidAddr,

    #[error("Invalid MQTT_PORT format")]
    InvalidPort,
}
