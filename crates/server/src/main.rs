//! Sampark server entry point.

use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use sampark_api::{middleware::auth_middleware, router as api_router, AppState};
use sampark_common::{Config, DataCipher};
use sampark_core::{
    ApprovalService, AuditService, AuthService, ComplaintService, EmailService, EventService,
    GamificationService, RegistrationService, StatsService, TaskService, UserService, VoterService,
};
use sampark_db::repositories::{
    AuditLogRepository, BadgeRepository, ComplaintRepository, EventRepository,
    LoginAuditRepository, TaskRepository, UserRepository, VolunteerRequestRepository,
    VoterRequestRepository, VoterRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sampark=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting sampark server...");

    // Load configuration
    let config = Config::load()?;
    let cipher = DataCipher::from_base64_key(&config.security.data_key)?;

    // Connect to database
    let db = sampark_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    sampark_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
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

    // Initialize services
    let email_service = EmailService::new(config.smtp.clone(), config.server.url.clone());
    if !email_service.is_enabled() {
        info!("SMTP not configured; email notifications disabled");
    }

    let auth_service = AuthService::new(
        user_repo.clone(),
        login_audit_repo.clone(),
        config.auth.clone(),
        cipher.clone(),
        config.security.ip_salt.clone(),
    );
    let registration_service = RegistrationService::new(
        Arc::clone(&db),
        user_repo.clone(),
        volunteer_request_repo.clone(),
        voter_request_repo.clone(),
        login_audit_repo,
        cipher,
        config.security.ip_salt.clone(),
        config.auth.bcrypt_cost,
    );
    let approval_service = ApprovalService::new(
        Arc::clone(&db),
        volunteer_request_repo.clone(),
        voter_request_repo.clone(),
        email_service.clone(),
    );
    let user_service = UserService::new(user_repo.clone(), config.auth.bcrypt_cost);
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

    // Create app state
    let state = AppState {
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
    };

    // CORS: pin to the configured dashboard origin when one is set.
    let cors = match &config.server.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
