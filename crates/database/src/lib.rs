//! SQLite persistence layer for the Cheeko toy console.
//!
//! This crate provides async database operations for the device allowlist
//! and claimed toys using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{allowlist, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:cheeko.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Authorize a serial number for claiming
//!     allowlist::create_entry(db.pool(), "SN-001").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod allowlist;
pub mod error;
pub mod models;
pub mod toy;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{AllowlistEntry, Language, RoleType, Toy, Voice};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Handle on the console's SQLite pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connections kept in the pool. Sized for one console process serving
    /// interactive traffic, not a fleet ingestion path.
    const POOL_SIZE: u32 = 20;

    /// Open the console database, creating the file when it does not exist.
    ///
    /// Accepts any SQLite URL sqlx understands: `sqlite:cheeko.db?mode=rwc`
    /// in deployment, `sqlite::memory:` in tests.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(Self::POOL_SIZE)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {}", url);
        Ok(Self { pool })
    }

    /// Bring the schema up to date. Called once at startup, after connect.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }

    /// The underlying pool, as the per-entity CRUD functions expect it.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, RoleType, Voice};
    use chrono::Utc;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_allowlist_and_claim_round_trip() {
        let db = test_db().await;

        allowlist::create_entry(db.pool(), "SN-001").await.unwrap();

        let toy = models::Toy {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "user-1".to_string(),
            serial_number: "SN-001".to_string(),
            name: "Toy 7".to_string(),
            role_type: RoleType::default(),
            language: Language::default(),
            voice: Voice::default(),
            activation_key: "abc123".to_string(),
            last_online: None,
            created_at: Utc::now(),
        };
        toy::create_toy(db.pool(), &toy).await.unwrap();

        let toys = toy::list_toys_for_owner(db.pool(), "user-1").await.unwrap();
        assert_eq!(toys.len(), 1);
        assert_eq!(toys[0].serial_number, "SN-001");

        assert_eq!(allowlist::count_entries(db.pool()).await.unwrap(), 1);
        assert_eq!(toy::count_toys(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_persona_enums_round_trip_as_fleet_strings() {
        let db = test_db().await;

        let toy = models::Toy {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "user-1".to_string(),
            serial_number: "SN-002".to_string(),
            name: "Toy 8".to_string(),
            role_type: RoleType::MathTutor,
            language: Language::French,
            voice: Voice::DeepVoice,
            activation_key: "abc123".to_string(),
            last_online: None,
            created_at: Utc::now(),
        };
        toy::create_toy(db.pool(), &toy).await.unwrap();

        // Stored as the spaced strings the fleet expects.
        let raw: (String, String, String) = sqlx::query_as(
            "SELECT role_type, language, voice FROM toys WHERE serial_number = ?",
        )
        .bind("SN-002")
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(raw.0, "Math Tutor");
        assert_eq!(raw.1, "French");
        assert_eq!(raw.2, "Deep Voice");

        let fetched = toy::get_toy(db.pool(), &toy.id).await.unwrap();
        assert_eq!(fetched.role_type, RoleType::MathTutor);
        assert_eq!(fetched.voice, Voice::DeepVoice);
    }
}
