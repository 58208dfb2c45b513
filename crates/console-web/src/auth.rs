//! Request principal extraction.
//!
//! Authentication itself lives in the hosted identity layer in front of this
//! service; by the time a request reaches us it carries the session's user id
//! and email as trusted headers. Routes declare their requirement by taking
//! [`CurrentUser`] as an argument; requests without a principal get a 401
//! before the handler body runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ConsoleError;
use crate::state::AppState;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated principal of one request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
}

impl CurrentUser {
    /// Admin gate: the principal's email must be on the configured
    /// allowlist. An allowlist check, not a role system.
    pub fn require_admin(&self, state: &AppState) -> Result<(), ConsoleError> {
        match &self.email {
            Some(email) if state.is_admin(email) => Ok(()),
            _ => Err(ConsoleError::Forbidden),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ConsoleError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(ConsoleError::Unauthorized)?
            .to_string();

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());

        Ok(CurrentUser { id, email })
    }
}
