//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLx failure (connection, query execution).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failed at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No allowlist entry or toy matched the given key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A row already holds the given serial number. Allowlist inserts hit
    /// this on duplicate serials; toy inserts should not, because claiming
    /// checks for the existing record first.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_entity_and_key() {
        let err = DatabaseError::NotFound {
            entity: "Toy",
            id: "toy-1".to_string(),
        };
        assert_eq!(err.to_string(), "Toy not found: toy-1");

        let err = DatabaseError::AlreadyExists {
            entity: "AllowlistEntry",
            id: "SN-001".to_string(),
        };
        assert_eq!(err.to_string(), "AllowlistEntry already exists: SN-001");
    }
}
