//! Broker connection configuration.

use std::time::Duration;

use rumqttc::MqttOptions;
use uuid::Uuid;

/// Configuration for connecting to the MQTT broker.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Broker hostname or IP.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Optional broker credentials.
    pub username: Option<String>,
    /// Optional broker credentials.
    pub password: Option<String>,
    /// Client id prefix; a fresh UUID is appended per session so concurrent
    /// dispatches never collide on the broker.
    pub client_prefix: String,
}

impl BrokerConfig {
    /// Create a new configuration with the given broker address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            client_prefix: "cheeko_web".to_string(),
        }
    }

    /// Set broker credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Generate a fresh client id for one session.
    pub fn client_id(&self) -> String {
        format!("{}_{}", self.client_prefix, Uuid::new_v4())
    }

    /// Build rumqttc options for one session. Sessions are always clean:
    /// nothing about a dispatch survives the connection that carried it.
    pub fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id(), &self.host, self.port);
        options.set_clean_session(true);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options.set_credentials(username, password);
        }
        options
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 1883)
    }
}
