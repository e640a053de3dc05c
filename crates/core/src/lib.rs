//! Core business logic for sampark.

pub mod services;

pub use sampark_common::generate_id;
pub use services::*;
