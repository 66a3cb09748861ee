//! Application state for forno-server

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtConfig, JwtService, RateLimiter};
use crate::config::Config;
use crate::db::{DbService, users};
use crate::util::hash_password;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// JWT issuing/validation for customers and admins
    pub jwt: Arc<JwtService>,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Open the database, run migrations and seed the configured admin
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;

        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            let hash = hash_password(password).map_err(|e| format!("hash admin password: {e}"))?;
            users::ensure_admin(&db.pool, email, &hash).await?;
        }

        let jwt = JwtService::with_config(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiry_hours,
        ));

        Ok(Self {
            pool: db.pool,
            config: Arc::new(config.clone()),
            jwt: Arc::new(jwt),
            rate_limiter: RateLimiter::new(),
        })
    }
}
