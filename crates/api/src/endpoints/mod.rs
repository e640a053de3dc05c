//! API endpoint modules.

use axum::{routing::get, Router};

use crate::middleware::AppState;
use crate::response::ApiResponse;

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod events;
pub mod gamification;
pub mod tasks;
pub mod users;
pub mod voters;

/// Liveness probe.
async fn health() -> ApiResponse<serde_json::Value> {
    ApiResponse::ok(serde_json::json!({ "status": "ok" }))
}

/// Assemble the full API router. The caller layers authentication and
/// tracing middleware on top.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/voters", voters::router())
        .nest("/complaints", complaints::router())
        .nest("/tasks", tasks::router())
        .nest("/events", events::router())
        .nest("/gamification", gamification::router())
        .nest("/admin", admin::router())
}
