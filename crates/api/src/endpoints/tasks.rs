//! Task lifecycle endpoints. Staff only.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use sampark_common::AppResult;
use sampark_core::CreateTaskInput;
use sampark_db::entities::{task, user::Role};
use sampark_db::repositories::TaskFilter;
use serde::Deserialize;

use crate::{
    extractors::{require_admin, require_staff, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct ListQuery {
    status: Option<task::TaskStatus>,
    assigned_to: Option<String>,
    created_by: Option<String>,
    /// Shortcut for "assigned to me".
    mine: Option<bool>,
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
    Json(input): Json<CreateTaskInput>,
) -> AppResult<ApiResponse<task::Model>> {
    require_admin(&user)?;
    let task = state.task_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(task))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<task::Model>>> {
    require_staff(&user)?;

    let mut filter = TaskFilter {
        status: query.status,
        assigned_to: query.assigned_to,
        created_by: query.created_by,
    };
    if query.mine.unwrap_or(false) {
        filter.assigned_to = Some(user.id);
    }

    let tasks = state
        .task_service
        .list(
            &filter,
            query.limit.unwrap_or(50).min(100),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(ApiResponse::ok(tasks))
}

async fn get_one(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<task::Model>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(state.task_service.get(&id).await?))
}

async fn assign(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AssignBody>,
) -> AppResult<ApiResponse<task::Model>> {
    require_admin(&user)?;

    let task = state.task_service.assign(&id, &body.volunteer_id).await?;
    state
        .audit_service
        .record(
            &user.id,
            "task.assign",
            Some("task"),
            Some(&id),
            Some(serde_json::json!({ "volunteerId": body.volunteer_id })),
        )
        .await;

    Ok(ApiResponse::ok(task))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.task_service.delete(&id).await?;
    state
        .audit_service
        .record(&user.id, "task.delete", Some("task"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn start(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_staff(&user)?;

    state
        .task_service
        .begin(&id, &user.id, user.role == Role::Admin)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

async fn complete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<task::Model>> {
    require_staff(&user)?;

    let task = state
        .task_service
        .complete(&id, &user.id, user.role == Role::Admin)
        .await?;

    Ok(ApiResponse::ok(task))
}

async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<task::Model>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(state.task_service.join(&id, &user.id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).delete(delete))
        .route("/{id}/assign", post(assign))
        .route("/{id}/start", post(start))
        .route("/{id}/complete", post(complete))
        .route("/{id}/join", post(join))
}
