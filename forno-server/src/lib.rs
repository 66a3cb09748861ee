//! forno-server: HTTP backend for the Forno restaurant storefront
//!
//! Serves the public menu and store status, customer checkout (offline
//! payment orders and online payment intents), the admin back office and the
//! payment processor webhook, over a SQLite database.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod receipt;
pub mod services;
pub mod state;
pub mod util;

pub use api::build_app;
pub use config::Config;
pub use state::AppState;

/// Security event logging under `target: "security"`
///
/// ```ignore
/// security_log!(WARN, "login_failed", email = %email);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            level = "WARN",
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            level = "INFO",
            $($arg)*
        );
    };
}
