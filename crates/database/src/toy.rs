//! Claimed-toy CRUD operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Language, RoleType, Toy, Voice};

/// Insert a new toy record.
pub async fn create_toy(pool: &SqlitePool, toy: &Toy) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO toys (id, owner_id, serial_number, name, role_type,
                          language, voice, activation_key, last_online, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&toy.id)
    .bind(&toy.owner_id)
    .bind(&toy.serial_number)
    .bind(&toy.name)
    .bind(toy.role_type)
    .bind(toy.language)
    .bind(toy.voice)
    .bind(&toy.activation_key)
    .bind(toy.last_online)
    .bind(toy.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Toy",
                    id: toy.serial_number.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a toy by ID.
pub async fn get_toy(pool: &SqlitePool, id: &str) -> Result<Toy> {
    sqlx::query_as::<_, Toy>(
        r#"
        SELECT id, owner_id, serial_number, name, role_type,
               language, voice, activation_key, last_online, created_at
        FROM toys
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Toy",
        id: id.to_string(),
    })
}

/// Look up a toy by serial number, returning None when unclaimed.
pub async fn find_toy_by_serial(pool: &SqlitePool, serial_number: &str) -> Result<Option<Toy>> {
    let toy = sqlx::query_as::<_, Toy>(
        r#"
        SELECT id, owner_id, serial_number, name, role_type,
               language, voice, activation_key, last_online, created_at
        FROM toys
        WHERE serial_number = ?
        "#,
    )
    .bind(serial_number)
    .fetch_optional(pool)
    .await?;

    Ok(toy)
}

/// List an owner's toys, newest first.
pub async fn list_toys_for_owner(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Toy>> {
    let toys = sqlx::query_as::<_, Toy>(
        r#"
        SELECT id, owner_id, serial_number, name, role_type,
               language, voice, activation_key, last_online, created_at
        FROM toys
        WHERE owner_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(toys)
}

/// Update a toy's mutable settings.
pub async fn update_settings(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    role_type: RoleType,
    language: Language,
    voice: Voice,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE toys
        SET name = ?, role_type = ?, language = ?, voice = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(role_type)
    .bind(language)
    .bind(voice)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Toy",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Reassign a claimed toy to a new owner (last claimer wins).
pub async fn reassign_owner(pool: &SqlitePool, serial_number: &str, owner_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE toys
        SET owner_id = ?
        WHERE serial_number = ?
        "#,
    )
    .bind(owner_id)
    .bind(serial_number)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Toy",
            id: serial_number.to_string(),
        });
    }

    Ok(())
}

/// Record a device check-in. Called by the ingestion path, not the console UI.
pub async fn touch_last_online(
    pool: &SqlitePool,
    serial_number: &str,
    seen_at: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE toys
        SET last_online = ?
        WHERE serial_number = ?
        "#,
    )
    .bind(seen_at)
    .bind(serial_number)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Toy",
            id: serial_number.to_string(),
        });
    }

    Ok(())
}

/// Delete a toy by ID.
pub async fn delete_toy(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM toys
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Toy",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count claimed toys.
pub async fn count_toys(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM toys
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

    fn sample_toy(owner: &str, serial: &str) -> Toy {
        Toy {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            serial_number: serial.to_string(),
            name: "Toy 42".to_string(),
            role_type: RoleType::default(),
            language: Language::default(),
            voice: Voice::default(),
            activation_key: "abc123".to_string(),
            last_online: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_toy_crud() {
        let db = test_db().await;

        let toy = sample_toy("user-1", "SN-001");
        create_toy(db.pool(), &toy).await.unwrap();

        let fetched = get_toy(db.pool(), &toy.id).await.unwrap();
        assert_eq!(fetched.owner_id, "user-1");
        assert_eq!(fetched.role_type, RoleType::PuzzleSolver);
        assert_eq!(fetched.voice, Voice::SparklesForKids);
        assert!(fetched.last_online.is_none());

        update_settings(
            db.pool(),
            &toy.id,
            "Bedtime Bear",
            RoleType::StoryTeller,
            Language::Hindi,
            Voice::SoftCalmVoice,
        )
        .await
        .unwrap();
        let fetched = get_toy(db.pool(), &toy.id).await.unwrap();
        assert_eq!(fetched.name, "Bedtime Bear");
        assert_eq!(fetched.role_type, RoleType::StoryTeller);
        assert_eq!(fetched.language, Language::Hindi);

        let toys = list_toys_for_owner(db.pool(), "user-1").await.unwrap();
        assert_eq!(toys.len(), 1);

        delete_toy(db.pool(), &toy.id).await.unwrap();
        let result = get_toy(db.pool(), &toy.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_serial_is_unique() {
        let db = test_db().await;

        create_toy(db.pool(), &sample_toy("user-1", "SN-001")).await.unwrap();
        let result = create_toy(db.pool(), &sample_toy("user-2", "SN-001")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_reassign_owner() {
        let db = test_db().await;

        create_toy(db.pool(), &sample_toy("user-1", "SN-001")).await.unwrap();
        reassign_owner(db.pool(), "SN-001", "user-2").await.unwrap();

        let toy = find_toy_by_serial(db.pool(), "SN-001").await.unwrap().unwrap();
        assert_eq!(toy.owner_id, "user-2");
    }

    #[tokio::test]
    async fn test_touch_last_online() {
        let db = test_db().await;

        create_toy(db.pool(), &sample_toy("user-1", "SN-001")).await.unwrap();
        let seen = Utc::now();
        touch_last_online(db.pool(), "SN-001", seen).await.unwrap();

        let toy = find_toy_by_serial(db.pool(), "SN-001").await.unwrap().unwrap();
        let stored = toy.last_online.unwrap();
        assert!((stored - seen).num_seconds().abs() < 1);
    }
}
