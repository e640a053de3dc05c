//! Complaint lifecycle endpoints.
//!
//! The showcase listing is public; everything else requires a signed-in
//! user. Voters only ever see their own complaints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use sampark_common::{AppError, AppResult};
use sampark_core::{CreateComplaintInput, ResolveComplaintInput};
use sampark_db::entities::{complaint, user::Role};
use sampark_db::repositories::ComplaintFilter;
use serde::Deserialize;

use crate::{
    extractors::{require_admin, require_staff, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct ListQuery {
    status: Option<complaint::ComplaintStatus>,
    assigned_to: Option<String>,
    created_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(Deserialize)]
struct PageQuery {
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(Deserialize)]
struct AssignBody {
    volunteer_id: String,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateComplaintInput>,
) -> AppResult<ApiResponse<complaint::Model>> {
    let complaint = state.complaint_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(complaint))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<complaint::Model>>> {
    let mut filter = ComplaintFilter {
        status: query.status,
        assigned_to: query.assigned_to,
        created_by: query.created_by,
    };

    // Voters cannot browse the full queue.
    if user.role == Role::Voter {
        filter.created_by = Some(user.id);
    }

    let complaints = state
        .complaint_service
        .list(
            &filter,
            query.limit.unwrap_or(50).min(100),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(complaints))
}

/// Approved resolutions for public display. No authentication.
async fn showcase(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<complaint::Model>>> {
    let complaints = state
        .complaint_service
        .showcase(query.limit.unwrap_or(20).min(100), query.offset.unwrap_or(0))
        .await?;

    Ok(ApiResponse::ok(complaints))
}

async fn get_one(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<complaint::Model>> {
    let complaint = state.complaint_service.get(&id).await?;

    if user.role == Role::Voter && complaint.created_by != user.id {
        return Err(AppError::Forbidden(
            "You can only view your own complaints".to_string(),
        ));
    }

    Ok(ApiResponse::ok(complaint))
}

async fn assign(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AssignBody>,
) -> AppResult<ApiResponse<complaint::Model>> {
    require_admin(&user)?;

    let complaint = state.complaint_service.assign(&id, &body.volunteer_id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "complaint.assign",
            Some("complaint"),
            Some(&id),
            Some(serde_json::json!({ "volunteerId": body.volunteer_id })),
        )
        .await;

    Ok(ApiResponse::ok(complaint))
}

/// Volunteer self-assignment of an unclaimed pending complaint.
async fn accept(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<complaint::Model>> {
    require_staff(&user)?;

    let complaint = state.complaint_service.accept(&id, &user.id).await?;
    Ok(ApiResponse::ok(complaint))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.complaint_service.delete(&id).await?;
    state
        .audit_service
        .record(&user.id, "complaint.delete", Some("complaint"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn begin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .complaint_service
        .begin(&id, &user.id, user.role == Role::Admin)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn resolve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ResolveComplaintInput>,
) -> AppResult<ApiResponse<complaint::Model>> {
    let complaint = state
        .complaint_service
        .resolve(&id, &user.id, user.role == Role::Admin, input)
        .await?;

    Ok(ApiResponse::ok(complaint))
}

async fn flag(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_staff(&user)?;

    state.complaint_service.flag(&id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn reopen(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.complaint_service.reopen(&id).await?;
    state
        .audit_service
        .record(&user.id, "complaint.reopen", Some("complaint"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Approve a resolution for the public showcase.
async fn approve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<complaint::Model>> {
    require_admin(&user)?;

    let complaint = state.complaint_service.approve_resolution(&id).await?;
    state
        .audit_service
        .record(&user.id, "complaint.approve", Some("complaint"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(complaint))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/showcase", get(showcase))
        .route("/{id}", get(get_one).delete(delete))
        .route("/{id}/accept", post(accept))
        .route("/{id}/assign", post(assign))
        .route("/{id}/begin", post(begin))
        .route("/{id}/resolve", post(resolve))
        .route("/{id}/flag", post(flag))
        .route("/{id}/reopen", post(reopen))
        .route("/{id}/approve", post(approve))
}
