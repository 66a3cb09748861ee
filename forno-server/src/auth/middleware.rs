//! Authentication middleware
//!
//! Axum middleware for JWT authentication and admin authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::security_log;
use crate::state::AppState;

/// Require a valid bearer token.
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>` and
/// inserts [`CurrentUser`] into the request extensions. CORS preflight
/// requests pass through untouched.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state.jwt, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require `role == admin`. Must run after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            user_id = user.id,
            email = %user.email,
            uri = ?req.uri()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}

/// Validate the bearer token in `headers`
pub(crate) fn authenticate(
    jwt: &JwtService,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let token = match headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Cabeçalho de autorização inválido"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = ?uri);
            return Err(AppError::unauthorized());
        }
    };

    let claims = jwt.validate_token(token).map_err(|e| {
        security_log!(WARN, "auth_failed", error = %e, uri = ?uri);
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    CurrentUser::try_from(claims).map_err(|e| AppError::invalid_token(e.to_string()))
}
