//! Authentication and registration endpoints.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use sampark_common::AppResult;
use sampark_core::{
    ChangePasswordInput, LoginInput, VolunteerSignupInput, VoterRegistrationInput, VoterSignupInput,
};
use serde::Serialize;
use tracing::warn;

use crate::{
    endpoints::users::UserResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Registration request receipt.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub request_id: String,
    pub status: String,
}

/// File a volunteer registration request.
async fn signup_volunteer(
    State(state): State<AppState>,
    Json(input): Json<VolunteerSignupInput>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let request = state.registration_service.submit_volunteer(input).await?;

    if let Err(e) = state
        .email_service
        .notify_admin_new_request("volunteer", &request.email)
        .await
    {
        warn!(error = %e, "Failed to notify admin of new volunteer request");
    }

    Ok(ApiResponse::ok(SignupResponse {
        request_id: request.id,
        status: "pending".to_string(),
    }))
}

/// File a voter registration request.
async fn signup_voter(
    State(state): State<AppState>,
    Json(input): Json<VoterSignupInput>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let request = state.registration_service.submit_voter(input).await?;

    if let Err(e) = state
        .email_service
        .notify_admin_new_request("voter", &request.email)
        .await
    {
        warn!(error = %e, "Failed to notify admin of new voter request");
    }

    Ok(ApiResponse::ok(SignupResponse {
        request_id: request.id,
        status: "pending".to_string(),
    }))
}

/// Register a voter account directly. No admin review; the account is
/// active immediately.
async fn register_voter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<VoterRegistrationInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let source_ip = client_ip(&headers);
    let account = state
        .registration_service
        .register_voter(input, source_ip.as_deref())
        .await?;

    Ok(ApiResponse::ok(account.into()))
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Sign in with email or mobile number plus password.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let source_ip = client_ip(&headers);
    let (user, token) = state.auth_service.login(input, source_ip.as_deref()).await?;

    Ok(ApiResponse::ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Change the caller's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.user_service.change_password(&user.id, input).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// First proxy hop wins; the server itself sits behind a reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup/volunteer", post(signup_volunteer))
        .route("/signup/voter", post(signup_voter))
        .route("/register-voter", post(register_voter))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );

        assert_eq!(client_ip(&headers), Some("203.0.113.7".to_string()));
    }

    #[test]
    fn test_client_ip_absent() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
