//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use device_link::BrokerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Broker settings for toy dispatch sessions.
    pub broker: BrokerConfig,
    /// Lower-cased emails allowed onto the admin surface.
    pub admin_emails: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, broker: BrokerConfig, admin_emails: Vec<String>) -> Self {
        Self {
            db,
            broker,
            admin_emails: Arc::new(admin_emails),
        }
    }

    /// Whether the given email may use the admin surface.
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == &email.to_lowercase())
    }
}
