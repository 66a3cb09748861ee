//! Shared types for Forno
//!
//! Domain models, the error/envelope system and the pure business rules
//! (store hours, cart pricing, webhook signatures) used by the server and
//! the payment mock.

pub mod error;
pub mod models;
pub mod payment;
pub mod pricing;
pub mod store_hours;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
