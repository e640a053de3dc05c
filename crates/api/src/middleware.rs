//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use sampark_core::{
    ApprovalService, AuditService, AuthService, ComplaintService, EmailService, EventService,
    GamificationService, RegistrationService, StatsService, TaskService, UserService, VoterService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub approval_service: ApprovalService,
    pub user_service: UserService,
    pub voter_service: VoterService,
    pub complaint_service: ComplaintService,
    pub task_service: TaskService,
    pub event_service: EventService,
    pub gamification_service: GamificationService,
    pub stats_service: StatsService,
    pub audit_service: AuditService,
    pub email_service: EmailService,
}

/// Authentication middleware.
///
/// Verifies the bearer token and re-reads the user row, so a deactivated
/// or demoted account loses access on its next request regardless of what
/// the token claims.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Ok(claims) = state.auth_service.verify_token(token) {
                    if let Ok(user) = state.user_service.get(&claims.sub).await {
                        if user.is_active {
                            req.extensions_mut().insert(user);
                        }
                    }
                }
            }
        }
    }

    next.run(req).await
}
