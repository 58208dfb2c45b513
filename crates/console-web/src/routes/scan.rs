//! QR intake route.

use axum::Json;
use provisioning::{parse_scan_payload, ScanPayload};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::Result;

/// Decoded text from the scanning widget.
#[derive(Deserialize)]
pub struct ScanRequest {
    pub text: String,
}

/// Decode a QR payload into serial number and activation key.
///
/// Malformed payloads come back as a 422 the scan UI toasts over while the
/// scanner stays open for another attempt.
pub async fn decode_api(
    _user: CurrentUser,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanPayload>> {
    let payload = parse_scan_payload(&req.text)?;
    Ok(Json(payload))
}
