//! Admin allowlist surface.
//!
//! Every handler here passes the admin gate first: the authenticated email
//! must be on the configured `ADMIN_EMAILS` allowlist.

use axum::extract::{Path, State};
use axum::Json;
use database::allowlist;
use database::models::AllowlistEntry;
use database::validation::validate_serial_number;
use database::{toy, DatabaseError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ConsoleError, Result};
use crate::state::AppState;

/// Request to authorize a new serial number.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub serial_number: String,
}

/// Console-wide counts for the admin dashboard.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub device_count: i64,
    pub toy_count: i64,
}

/// List every allowlist entry, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<AllowlistEntry>>> {
    user.require_admin(&state)?;
    let entries = allowlist::list_entries(state.db.pool()).await?;
    Ok(Json(entries))
}

/// Authorize a serial number for claiming.
pub async fn create_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<Json<AllowlistEntry>> {
    user.require_admin(&state)?;

    let serial = req.serial_number.trim();
    validate_serial_number(serial).map_err(|e| ConsoleError::Validation(e.to_string()))?;

    let entry = allowlist::create_entry(state.db.pool(), serial)
        .await
        .map_err(|e| match e {
            DatabaseError::AlreadyExists { .. } => {
                ConsoleError::Validation(format!("Serial number {} is already registered", serial))
            }
            other => ConsoleError::Database(other),
        })?;

    info!(serial = %serial, admin = %user.id, "Device added to allowlist");
    Ok(Json(entry))
}

/// Flip whether a serial number may be claimed.
pub async fn toggle_api(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(serial): Path<String>,
) -> Result<Json<AllowlistEntry>> {
    user.require_admin(&state)?;

    let entry = allowlist::get_entry(state.db.pool(), &serial).await?;
    allowlist::set_active(state.db.pool(), &serial, !entry.is_active).await?;
    let entry = allowlist::get_entry(state.db.pool(), &serial).await?;

    info!(serial = %serial, is_active = entry.is_active, admin = %user.id, "Device toggled");
    Ok(Json(entry))
}

/// Dashboard counts.
pub async fn stats_api(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Stats>> {
    user.require_admin(&state)?;

    let device_count = allowlist::count_entries(state.db.pool()).await?;
    let toy_count = toy::count_toys(state.db.pool()).await?;

    Ok(Json(Stats {
        device_count,
        toy_count,
    }))
}
