//! User account endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use sampark_common::AppResult;
use sampark_core::UpdateProfileInput;
use sampark_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{require_admin, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: &'static str,
    pub avatar_url: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
    pub points: i32,
    pub level: i32,
    pub tasks_completed: i32,
    pub complaints_resolved: i32,
    pub collaborations: i32,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            role: user.role.as_str(),
            avatar_url: user.avatar_url,
            is_approved: user.is_approved,
            is_active: user.is_active,
            points: user.points,
            level: user.level,
            tasks_completed: user.tasks_completed,
            complaints_resolved: user.complaints_resolved,
            collaborations: user.collaborations,
            last_login_at: user.last_login_at.map(|t| t.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// The caller's own account.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Update the caller's profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&user.id, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

#[derive(Deserialize)]
struct ListQuery {
    role: Option<user::Role>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// List accounts. Admin only.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    require_admin(&user)?;

    let users = state
        .user_service
        .list(
            query.role,
            query.limit.unwrap_or(50).min(100),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Deactivate an account. Admin only.
async fn deactivate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.user_service.deactivate(&id).await?;
    state
        .audit_service
        .record(&user.id, "user.deactivate", Some("user"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/me", get(me).patch(update_me))
        .route("/{id}/deactivate", post(deactivate))
}
