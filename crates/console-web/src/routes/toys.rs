//! Toy management routes.
//!
//! The settings update is the two-phase path from the original console: the
//! database write lands first, then the update is dispatched to the toy over
//! the broker. A dispatch failure never fails the request; the toy applies
//! the persisted settings on its next reconnect, so the handler downgrades
//! it to `deviceSynced: false` plus a warning the UI can toast.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use database::models::{Language, RoleType, Toy, Voice};
use database::validation::validate_name;
use database::{toy, DatabaseError};
use device_link::PersonaUpdate;
use provisioning::{is_online, provision_device, ProvisionOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::error::{ConsoleError, Result};
use crate::state::AppState;

/// A toy as the UI sees it, with the derived online flag.
#[derive(Serialize)]
pub struct ToyView {
    #[serde(flatten)]
    pub toy: Toy,
    pub online: bool,
}

impl ToyView {
    fn now(toy: Toy) -> Self {
        let online = is_online(toy.last_online, Utc::now());
        Self { toy, online }
    }
}

/// Request to claim a toy.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub serial_number: String,
    pub activation_key: String,
}

/// Claim result.
#[derive(Serialize)]
pub struct ProvisionResponse {
    pub outcome: &'static str,
    pub toy: Toy,
}

/// Request to update a toy's settings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub name: String,
    pub role_type: RoleType,
    pub language: Language,
    pub voice: Voice,
}

/// Settings update result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub toy: Toy,
    pub device_synced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// List the caller's toys, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ToyView>>> {
    let toys = toy::list_toys_for_owner(state.db.pool(), &user.id).await?;
    Ok(Json(toys.into_iter().map(ToyView::now).collect()))
}

/// Claim a toy for the caller.
pub async fn provision_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ProvisionRequest>,
) -> Result<Json<ProvisionResponse>> {
    let outcome = provision_device(
        state.db.pool(),
        &user.id,
        req.serial_number.trim(),
        &req.activation_key,
    )
    .await?;

    let (outcome, toy) = match outcome {
        ProvisionOutcome::Created(toy) => ("created", toy),
        ProvisionOutcome::Transferred(toy) => ("transferred", toy),
    };
    Ok(Json(ProvisionResponse { outcome, toy }))
}

/// Fetch one of the caller's toys.
pub async fn get_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ToyView>> {
    let toy = owned_toy(&state, &user, &id).await?;
    Ok(Json(ToyView::now(toy)))
}

/// Save settings, then push them to the toy.
pub async fn update_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    let existing = owned_toy(&state, &user, &id).await?;
    validate_name(&req.name).map_err(|e| ConsoleError::Validation(e.to_string()))?;

    // Phase one: the durable write. If this fails, the request fails.
    toy::update_settings(
        state.db.pool(),
        &existing.id,
        req.name.trim(),
        req.role_type,
        req.language,
        req.voice,
    )
    .await?;
    let toy = toy::get_toy(state.db.pool(), &existing.id).await?;

    // Phase two: push to the device. Failure here is soft; the settings are
    // already saved and apply when the toy next reconnects.
    let dispatch = device_link::dispatch_device_update(
        &state.broker,
        &toy.serial_number,
        PersonaUpdate {
            role_type: toy.role_type,
            language: toy.language,
            voice: toy.voice,
        },
    )
    .await;

    let (device_synced, warning) = match dispatch {
        Ok(()) => (true, None),
        Err(e) => {
            warn!(serial = %toy.serial_number, error = %e, "Settings saved but device update failed");
            (
                false,
                Some("Settings saved. The toy will update when it next comes online.".to_string()),
            )
        }
    };

    Ok(Json(UpdateResponse {
        toy,
        device_synced,
        warning,
    }))
}

/// Delete one of the caller's toys.
pub async fn delete_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let toy = owned_toy(&state, &user, &id).await?;
    toy::delete_toy(state.db.pool(), &toy.id).await?;
    info!(serial = %toy.serial_number, owner = %user.id, "Toy deleted");
    Ok(Json(serde_json::json!({ "deleted": toy.id })))
}

/// Fetch a toy the caller owns. Another owner's toy comes back as 404, the
/// same as a nonexistent id, so toy ids don't leak across accounts.
async fn owned_toy(state: &AppState, user: &CurrentUser, id: &str) -> Result<Toy> {
    let toy = toy::get_toy(state.db.pool(), id).await?;
    if toy.owner_id != user.id {
        return Err(ConsoleError::Database(DatabaseError::NotFound {
            entity: "Toy",
            id: id.to_string(),
        }));
    }
    Ok(toy)
}
