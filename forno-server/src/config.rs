//! Server configuration

use rust_decimal::Decimal;
use shared::payment::{DEFAULT_TOLERANCE_SECS, VerificationMode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret (HS256)
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Printed on receipts
    pub store_name: String,
    /// Timezone the weekly schedule is written in
    pub store_timezone: chrono_tz::Tz,
    /// Flat fee for `entrega` orders
    pub delivery_fee: Decimal,
    /// Lifetime of an unpaid order intent
    pub intent_ttl_minutes: i64,
    pub webhook_mode: VerificationMode,
    /// HMAC secret for `X-Signature`
    pub webhook_secret: String,
    /// Static token for `X-Webhook-Token`
    pub webhook_token: String,
    pub webhook_tolerance_secs: i64,
    /// Seeded admin account (skipped when either is unset)
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Allowed CORS origins; empty means any
    pub cors_origins: Vec<String>,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, BoxError> {
        match std::env::var(name) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| format!("{name} has an invalid value: {raw}").into()),
            _ => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let store_timezone = std::env::var("STORE_TIMEZONE")
            .unwrap_or_else(|_| "America/Sao_Paulo".into())
            .parse::<chrono_tz::Tz>()
            .map_err(|e| format!("STORE_TIMEZONE: {e}"))?;

        let webhook_mode = match std::env::var("WEBHOOK_MODE") {
            Ok(raw) => VerificationMode::parse(&raw)
                .ok_or_else(|| format!("WEBHOOK_MODE must be hmac, token or either (got {raw})"))?,
            Err(_) => VerificationMode::default(),
        };

        // Only the secret the selected mode uses is mandatory
        let webhook_secret = if webhook_mode.accepts_hmac() {
            Self::require_secret("WEBHOOK_SECRET", &environment)?
        } else {
            std::env::var("WEBHOOK_SECRET").unwrap_or_default()
        };
        let webhook_token = if webhook_mode.accepts_token() {
            Self::require_secret("WEBHOOK_TOKEN", &environment)?
        } else {
            std::env::var("WEBHOOK_TOKEN").unwrap_or_default()
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "forno.db".into()),
            http_port: Self::parsed("HTTP_PORT", 8080)?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parsed("JWT_EXPIRY_HOURS", 24)?,
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "Forno".into()),
            store_timezone,
            delivery_fee: Self::parsed("DELIVERY_FEE", Decimal::new(700, 2))?,
            intent_ttl_minutes: Self::parsed("INTENT_TTL_MINUTES", 30)?,
            webhook_mode,
            webhook_secret,
            webhook_token,
            webhook_tolerance_secs: Self::parsed("WEBHOOK_TOLERANCE_SECS", DEFAULT_TOLERANCE_SECS)?,
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Development defaults around an explicit database file
    pub fn development(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            http_port: 8080,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiry_hours: 24,
            store_name: "Forno".into(),
            store_timezone: chrono_tz::America::Sao_Paulo,
            delivery_fee: Decimal::new(700, 2),
            intent_ttl_minutes: 30,
            webhook_mode: VerificationMode::Hmac,
            webhook_secret: "dev-WEBHOOK_SECRET-not-for-production".into(),
            webhook_token: "dev-WEBHOOK_TOKEN-not-for-production".into(),
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
            admin_email: None,
            admin_password: None,
            cors_origins: Vec::new(),
            log_dir: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_secret_falls_back_only_in_development() {
        let name = "FORNO_TEST_SECRET_THAT_IS_NEVER_SET";
        assert_eq!(
            Config::require_secret(name, "development").unwrap(),
            format!("dev-{name}-not-for-production")
        );
        assert!(Config::require_secret(name, "production").is_err());
    }

    #[test]
    fn development_defaults() {
        let cfg = Config::development("x.db");
        assert_eq!(cfg.delivery_fee, Decimal::new(7, 0));
        assert_eq!(cfg.webhook_tolerance_secs, 300);
        assert!(!cfg.is_production());
    }
}
