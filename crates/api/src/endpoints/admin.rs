//! Admin endpoints: registration review, dashboard, and audit log.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use sampark_common::AppResult;
use sampark_core::DashboardStats;
use sampark_db::entities::{audit_log, volunteer_request, voter_request, volunteer_request::RequestStatus};

use serde::Deserialize;

use crate::{
    endpoints::users::UserResponse,
    extractors::{require_admin, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct RequestListQuery {
    status: Option<RequestStatus>,
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(Deserialize)]
struct AuditQuery {
    actor_id: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

async fn list_volunteer_requests(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> AppResult<ApiResponse<Vec<volunteer_request::Model>>> {
    require_admin(&user)?;

    let requests = state
        .registration_service
        .list_volunteer_requests(
            query.status,
            query.limit.unwrap_or(50).min(100),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(requests))
}

async fn list_voter_requests(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> AppResult<ApiResponse<Vec<voter_request::Model>>> {
    require_admin(&user)?;

    let requests = state
        .registration_service
        .list_voter_requests(
            query.status,
            query.limit.unwrap_or(50).min(100),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(requests))
}

async fn approve_volunteer(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_admin(&user)?;

    let created = state.approval_service.approve_volunteer(&id, &user.id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "request.approve",
            Some("volunteer_request"),
            Some(&id),
            Some(serde_json::json!({ "userId": created.id })),
        )
        .await;

    Ok(ApiResponse::ok(created.into()))
}

async fn reject_volunteer(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.approval_service.reject_volunteer(&id, &user.id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "request.reject",
            Some("volunteer_request"),
            Some(&id),
            None,
        )
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn approve_voter(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_admin(&user)?;

    let created = state.approval_service.approve_voter(&id, &user.id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "request.approve",
            Some("voter_request"),
            Some(&id),
            Some(serde_json::json!({ "userId": created.id })),
        )
        .await;

    Ok(ApiResponse::ok(created.into()))
}

async fn reject_voter(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.approval_service.reject_voter(&id, &user.id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "request.reject",
            Some("voter_request"),
            Some(&id),
            None,
        )
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    require_admin(&user)?;
    Ok(ApiResponse::ok(state.stats_service.dashboard().await?))
}

async fn audit_log(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<ApiResponse<Vec<audit_log::Model>>> {
    require_admin(&user)?;

    let entries = state
        .audit_service
        .list(
            query.actor_id.as_deref(),
            query.limit.unwrap_or(50).min(200),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(entries))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests/volunteers", get(list_volunteer_requests))
        .route("/requests/volunteers/{id}/approve", post(approve_volunteer))
        .route("/requests/volunteers/{id}/reject", post(reject_volunteer))
        .route("/requests/voters", get(list_voter_requests))
        .route("/requests/voters/{id}/approve", post(approve_voter))
        .route("/requests/voters/{id}/reject", post(reject_voter))
        .route("/dashboard", get(dashboard))
        .route("/audit-log", get(audit_log))
}
