//! API integration tests.
//!
//! These tests exercise the router against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sampark_api::{middleware::AppState, router as api_router};
use sampark_common::{config::AuthConfig, DataCipher};
use sampark_core::{
    ApprovalService, AuditService, AuthService, ComplaintService, EmailService, EventService,
    GamificationService, RegistrationService, StatsService, TaskService, UserService, VoterService,
};
use sampark_db::entities::complaint;
use sampark_db::repositories::{
    AuditLogRepository, BadgeRepository, ComplaintRepository, EventRepository,
    LoginAuditRepository, TaskRepository, UserRepository, VolunteerRequestRepository,
    VoterRequestRepository, VoterRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        token_ttl_hours: 8,
        bcrypt_cost: 4,
    }
}

fn test_cipher() -> DataCipher {
    // 32 zero bytes, base64-encoded.
    let key = format!("{}=", "A".repeat(43));
    DataCipher::from_base64_key(&key).unwrap()
}

/// Build app state over a prepared mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let auth_config = test_auth_config();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let voter_repo = VoterRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let task_repo = TaskRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let badge_repo = BadgeRepository::new(Arc::clone(&db));
    let volunteer_request_repo = VolunteerRequestRepository::new(Arc::clone(&db));
    let voter_request_repo = VoterRequestRepository::new(Arc::clone(&db));
    let audit_repo = AuditLogRepository::new(Arc::clone(&db));
    let login_audit_repo = LoginAuditRepository::new(Arc::clone(&db));

    let email_service = EmailService::new(None, "http://localhost:3000".to_string());
    let auth_service = AuthService::new(
        user_repo.clone(),
        login_audit_repo.clone(),
        auth_config.clone(),
        test_cipher(),
        "test-salt".to_string(),
    );
    let registration_service = RegistrationService::new(
        Arc::clone(&db),
        user_repo.clone(),
        volunteer_request_repo.clone(),
        voter_request_repo.clone(),
        login_audit_repo,
        test_cipher(),
        "test-salt".to_string(),
        auth_config.bcrypt_cost,
    );
    let approval_service = ApprovalService::new(
        Arc::clone(&db),
        volunteer_request_repo.clone(),
        voter_request_repo.clone(),
        email_service.clone(),
    );
    let user_service = UserService::new(user_repo.clone(), auth_config.bcrypt_cost);
    let voter_service = VoterService::new(voter_repo);
    let gamification_service = GamificationService::new(user_repo.clone(), badge_repo);
    let complaint_service = ComplaintService::new(
        complaint_repo.clone(),
        user_repo.clone(),
        gamification_service.clone(),
    );
    let task_service = TaskService::new(
        task_repo.clone(),
        user_repo.clone(),
        gamification_service.clone(),
    );
    let event_service = EventService::new(event_repo);
    let stats_service = StatsService::new(
        user_repo,
        complaint_repo,
        task_repo,
        volunteer_request_repo,
        voter_request_repo,
        voter_service.clone(),
    );
    let audit_service = AuditService::new(audit_repo);

    AppState {
        auth_service,
        registration_service,
        approval_service,
        user_service,
        voter_service,
        complaint_service,
        task_service,
        event_service,
        gamification_service,
        stats_service,
        audit_service,
        email_service,
    }
}

fn create_test_router(db: DatabaseConnection) -> Router {
    api_router().with_state(create_test_state(db))
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    // find_by_email returns no rows; the login-audit insert fails on the
    // mock but is best effort.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<sampark_db::entities::user::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"identifier":"nobody@example.org","password":"whatever"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_invalid_email_is_rejected() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup/volunteer")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"name":"Ravi Kumar","email":"not-an-email","password":"longenough"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_showcase_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<complaint::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints/showcase")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_badge_catalog_is_public() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/gamification/catalog")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_dashboard_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/dashboard")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
