//! HTTP API layer for sampark.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: registration, approval, voters, complaints, tasks,
//!   events, gamification, admin
//! - **Extractors**: authenticated user from request extensions
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
