//! Common utilities and shared types for sampark.
//!
//! This crate provides foundational components used across all sampark crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Cryptography**: At-rest field encryption via [`DataCipher`], salted IP hashing
//! - **ID Generation**: ULID-based unique identifiers via [`generate_id`]
//!
//! # Example
//!
//! ```no_run
//! use sampark_common::{generate_id, AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = generate_id();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod id;

pub use config::Config;
pub use crypto::{hash_ip, DataCipher};
pub use error::{AppError, AppResult};
pub use id::generate_id;
