//! Voter roll endpoints. Staff only; the roll is canvassing data, not a
//! public surface.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use sampark_common::AppResult;
use sampark_core::{CreateVoterInput, UpdateVoterInput, VoterBreakdown};
use sampark_db::entities::voter;
use sampark_db::repositories::VoterFilter;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{require_admin, require_staff, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct ListQuery {
    ward: Option<String>,
    booth: Option<String>,
    category: Option<voter::VoterCategory>,
    search: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// A page of voters plus the total matching count, so the frontend can
/// paginate without a second request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoterPage {
    voters: Vec<voter::Model>,
    total: u64,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateVoterInput>,
) -> AppResult<ApiResponse<voter::Model>> {
    require_staff(&user)?;
    let voter = state.voter_service.create(input).await?;
    Ok(ApiResponse::ok(voter))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<VoterPage>> {
    require_staff(&user)?;

    let filter = VoterFilter {
        ward: query.ward,
        booth: query.booth,
        category: query.category,
        search: query.search,
    };

    let voters = state
        .voter_service
        .list(
            &filter,
            query.limit.unwrap_or(50).min(200),
            query.offset.unwrap_or(0),
        )
        .await?;
    let total = state.voter_service.count(&filter).await?;

    Ok(ApiResponse::ok(VoterPage { voters, total }))
}

async fn breakdown(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<VoterBreakdown>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(state.voter_service.breakdown().await?))
}

async fn get_one(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<voter::Model>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(state.voter_service.get(&id).await?))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateVoterInput>,
) -> AppResult<ApiResponse<voter::Model>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(state.voter_service.update(&id, input).await?))
}

/// Deleting roll data is admin-only and audited.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(&user)?;

    state.voter_service.delete(&id).await?;
    state
        .audit_service
        .record(&user.id, "voter.delete", Some("voter"), Some(&id), None)
        .await;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/breakdown", get(breakdown))
        .route("/{id}", get(get_one).patch(update).delete(delete))
}
