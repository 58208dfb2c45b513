//! Route handlers for the console web API.

pub mod admin;
pub mod health;
pub mod scan;
pub mod toys;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Toy management
        .route("/api/toys", get(toys::list_api).post(toys::provision_api))
        .route(
            "/api/toys/:id",
            get(toys::get_api)
                .put(toys::update_api)
                .delete(toys::delete_api),
        )
        // QR intake
        .route("/api/scan", post(scan::decode_api))
        // Admin allowlist surface
        .route(
            "/api/admin/devices",
            get(admin::list_api).post(admin::create_api),
        )
        .route("/api/admin/devices/:serial/toggle", post(admin::toggle_api))
        .route("/api/admin/stats", get(admin::stats_api))
}
