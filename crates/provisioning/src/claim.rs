//! Claiming a physical toy for an authenticated owner.

use chrono::Utc;
use database::models::{Language, RoleType, Toy, Voice};
use database::validation::MIN_ACTIVATION_KEY_LENGTH;
use database::{allowlist, toy};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ProvisionError, Result};

/// How a claim was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A fresh toy record was created for the caller.
    Created(Toy),
    /// The serial was already claimed; ownership moved to the caller.
    Transferred(Toy),
}

impl ProvisionOutcome {
    /// The toy record the claim resolved to.
    pub fn toy(&self) -> &Toy {
        match self {
            ProvisionOutcome::Created(toy) | ProvisionOutcome::Transferred(toy) => toy,
        }
    }
}

/// Bind a serial number to an owner.
///
/// The serial must name an active allowlist entry and the activation key must
/// be at least six characters. The key is a length check only; it is not
/// verified against the allowlist entry's credential. Claiming an
/// already-claimed serial reassigns ownership to the caller with no transfer
/// confirmation (last claimer wins). Both branches are idempotent under
/// retry with the same inputs.
pub async fn provision_device(
    pool: &SqlitePool,
    owner_id: &str,
    serial_number: &str,
    activation_key: &str,
) -> Result<ProvisionOutcome> {
    let entry = allowlist::find_entry(pool, serial_number).await?;
    match entry {
        Some(entry) if entry.is_active => {}
        _ => return Err(ProvisionError::UnknownOrInactiveDevice),
    }

    if activation_key.len() < MIN_ACTIVATION_KEY_LENGTH {
        return Err(ProvisionError::InvalidActivationKey);
    }

    if let Some(existing) = toy::find_toy_by_serial(pool, serial_number).await? {
        toy::reassign_owner(pool, serial_number, owner_id).await?;
        info!(
            serial = %serial_number,
            from = %existing.owner_id,
            to = %owner_id,
            "Toy transferred"
        );
        let toy = toy::get_toy(pool, &existing.id).await?;
        return Ok(ProvisionOutcome::Transferred(toy));
    }

    let toy = Toy {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        serial_number: serial_number.to_string(),
        name: generated_name(),
        role_type: RoleType::default(),
        language: Language::default(),
        voice: Voice::default(),
        activation_key: activation_key.to_string(),
        last_online: None,
        created_at: Utc::now(),
    };
    toy::create_toy(pool, &toy).await?;
    info!(serial = %serial_number, owner = %owner_id, "Toy claimed");

    Ok(ProvisionOutcome::Created(toy))
}

/// Default display name for a freshly claimed toy.
fn generated_name() -> String {
    format!("Toy {}", rand::thread_rng().gen_range(0..1000))
}
