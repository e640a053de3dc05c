//! Gamification endpoints: leaderboard and badges.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use sampark_common::AppResult;
use sampark_core::{next_level_threshold, BadgeSpec, BADGE_CATALOG};
use sampark_db::entities::badge;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{require_staff, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u64>,
}

/// One leaderboard row. Deliberately thinner than the full account view;
/// volunteers see each other's standings, not each other's contact details.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardEntry {
    id: String,
    name: String,
    avatar_url: Option<String>,
    points: i32,
    level: i32,
    tasks_completed: i32,
    complaints_resolved: i32,
}

async fn leaderboard(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<ApiResponse<Vec<LeaderboardEntry>>> {
    let users = state
        .gamification_service
        .leaderboard(query.limit.unwrap_or(10).min(100))
        .await?;

    let entries = users
        .into_iter()
        .map(|u| LeaderboardEntry {
            id: u.id,
            name: u.name,
            avatar_url: u.avatar_url,
            points: u.points,
            level: u.level,
            tasks_completed: u.tasks_completed,
            complaints_resolved: u.complaints_resolved,
        })
        .collect();

    Ok(ApiResponse::ok(entries))
}

/// The caller's standings.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MyStats {
    points: i32,
    level: i32,
    tasks_completed: i32,
    complaints_resolved: i32,
    collaborations: i32,
    /// Points needed for the next level; absent at the top level.
    next_level_at: Option<i32>,
    badges: Vec<badge::Model>,
}

/// The caller's own counters, level progress, and badges.
async fn my_stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MyStats>> {
    let badges = state.gamification_service.badges_for(&user.id).await?;

    Ok(ApiResponse::ok(MyStats {
        points: user.points,
        level: user.level,
        tasks_completed: user.tasks_completed,
        complaints_resolved: user.complaints_resolved,
        collaborations: user.collaborations,
        next_level_at: next_level_threshold(user.points),
        badges,
    }))
}

/// Every badge the system can award. Static; no authentication.
async fn catalog() -> ApiResponse<Vec<BadgeSpec>> {
    ApiResponse::ok(BADGE_CATALOG.to_vec())
}

/// The caller's own badges.
async fn my_badges(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<badge::Model>>> {
    Ok(ApiResponse::ok(
        state.gamification_service.badges_for(&user.id).await?,
    ))
}

/// Another user's badges. Staff only.
async fn badges_for(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<badge::Model>>> {
    require_staff(&user)?;
    Ok(ApiResponse::ok(
        state.gamification_service.badges_for(&user_id).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/my-stats", get(my_stats))
        .route("/catalog", get(catalog))
        .route("/badges", get(my_badges))
        .route("/badges/{user_id}", get(badges_for))
}
