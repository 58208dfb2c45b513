//! Device allowlist operations.
//!
//! Entries live in the `mqtt_auth` table (named for the broker auth role it
//! serves on the device side). Administrators create entries and toggle them
//! active/inactive; entries are never deleted in normal flow.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::AllowlistEntry;

/// Placeholder broker credential written on admin insert. The real credential
/// is provisioned onto the device at manufacture, not through this console.
pub const DEFAULT_PASSWORD_HASH: &str = "default_hash";

/// Add a serial number to the allowlist, active by default.
pub async fn create_entry(pool: &SqlitePool, serial_number: &str) -> Result<AllowlistEntry> {
    let entry = AllowlistEntry {
        serial_number: serial_number.to_string(),
        password_hash: DEFAULT_PASSWORD_HASH.to_string(),
        is_active: true,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO mqtt_auth (serial_number, password_hash, is_active, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&entry.serial_number)
    .bind(&entry.password_hash)
    .bind(entry.is_active)
    .bind(entry.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "AllowlistEntry",
                    id: entry.serial_number.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(entry)
}

/// Get an allowlist entry by serial number.
pub async fn get_entry(pool: &SqlitePool, serial_number: &str) -> Result<AllowlistEntry> {
    sqlx::query_as::<_, AllowlistEntry>(
        r#"
        SELECT serial_number, password_hash, is_active, created_at
        FROM mqtt_auth
        WHERE serial_number = ?
        "#,
    )
    .bind(serial_number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "AllowlistEntry",
        id: serial_number.to_string(),
    })
}

/// Look up an entry, returning None when the serial is unknown.
pub async fn find_entry(pool: &SqlitePool, serial_number: &str) -> Result<Option<AllowlistEntry>> {
    let entry = sqlx::query_as::<_, AllowlistEntry>(
        r#"
        SELECT serial_number, password_hash, is_active, created_at
        FROM mqtt_auth
        WHERE serial_number = ?
        "#,
    )
    .bind(serial_number)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Toggle whether a serial number may be claimed.
pub async fn set_active(pool: &SqlitePool, serial_number: &str, is_active: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE mqtt_auth
        SET is_active = ?
        WHERE serial_number = ?
        "#,
    )
    .bind(is_active)
    .bind(serial_number)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "AllowlistEntry",
            id: serial_number.to_string(),
        });
    }

    Ok(())
}

/// List all allowlist entries, newest first.
pub async fn list_entries(pool: &SqlitePool) -> Result<Vec<AllowlistEntry>> {
    let entries = sqlx::query_as::<_, AllowlistEntry>(
        r#"
        SELECT serial_number, password_hash, is_active, created_at
        FROM mqtt_auth
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Count allowlist entries.
pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM mqtt_auth
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_and_get_entry() {
        let db = test_db().await;

        let entry = create_entry(db.pool(), "SN-001").await.unwrap();
        assert!(entry.is_active);
        assert_eq!(entry.password_hash, DEFAULT_PASSWORD_HASH);

        let fetched = get_entry(db.pool(), "SN-001").await.unwrap();
        assert_eq!(fetched.serial_number, "SN-001");
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_serial_rejected() {
        let db = test_db().await;

        create_entry(db.pool(), "SN-001").await.unwrap();
        let result = create_entry(db.pool(), "SN-001").await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_set_active_toggles() {
        let db = test_db().await;

        create_entry(db.pool(), "SN-001").await.unwrap();
        set_active(db.pool(), "SN-001", false).await.unwrap();

        let entry = get_entry(db.pool(), "SN-001").await.unwrap();
        assert!(!entry.is_active);

        set_active(db.pool(), "SN-001", true).await.unwrap();
        let entry = get_entry(db.pool(), "SN-001").await.unwrap();
        assert!(entry.is_active);
    }

    #[tokio::test]
    async fn test_set_active_unknown_serial() {
        let db = test_db().await;
        let result = set_active(db.pool(), "SN-404", false).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_entry_unknown_is_none() {
        let db = test_db().await;
        let entry = find_entry(db.pool(), "SN-404").await.unwrap();
        assert!(entry.is_none());
    }
}
