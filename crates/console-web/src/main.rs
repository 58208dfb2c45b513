//! Web console API for managing Cheeko toys.
//!
//! JSON API over the database and broker: toy claiming and settings, QR
//! intake, and the admin allowlist surface. Authentication happens in the
//! hosted identity layer in front; requests arrive carrying the session's
//! user id and email as headers.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting console web server");
    if config.admin_emails.is_empty() {
        info!("ADMIN_EMAILS is empty; admin routes will reject every request");
    }

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(db, config.broker.clone(), config.admin_emails.clone());

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Console web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
