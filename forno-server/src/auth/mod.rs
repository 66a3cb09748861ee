//! Authentication: JWT service, middleware, extractor and rate limiting

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use rate_limit::RateLimiter;
