//! Campaign event endpoints.
//!
//! Listings are public so the campaign site can embed them; writes are
//! admin only.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use sampark_common::AppResult;
use sampark_core::{CreateEventInput, UpdateEventInput};
use sampark_db::entities::event;
use serde::Deserialize;

use crate::{
    extractors::{require_admin, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(Deserialize)]
struct UpcomingQuery {
    limit: Option<u64>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<event::Model>>> {
    let events = state
        .event_service
        .list(query.limit.unwrap_or(50).min(100), query.offset.unwrap_or(0))
        .await?;
    Ok(ApiResponse::ok(events))
}

async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<ApiResponse<Vec<event::Model>>> {
    let events = state
        .event_service
        .upcoming(query.limit.unwrap_or(10).min(50))
        .await?;
    Ok(ApiResponse::ok(events))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<event::Model>> {
    Ok(ApiResponse::ok(state.event_service.get(&id).await?))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> AppResult<ApiResponse<event::Model>> {
    require_admin(&user)?;
    let event = state.event_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(event))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateEventInput>,
) -> AppResult<ApiResponse<event::Model>> {
    require_admin(&user)?;
    Ok(ApiResponse::ok(state.event_service.update(&id, input).await?))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.event_service.delete(&id).await?;
    state
        .audit_service
        .record(&user.id, "event.delete", Some("event"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/upcoming", get(upcoming))
        .route("/{id}", get(get_one).patch(update).delete(delete))
}
