//! Account API Handlers

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    AuthResponse, LoginRequest, MIN_PASSWORD_LEN, ProfileUpdate, RegisterRequest, Role,
    UserProfile,
};

use crate::auth::CurrentUser;
use crate::db::{RepoError, users};
use crate::error::validate;
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_password, normalize_email, verify_password};

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    Ok(())
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

fn issue(state: &AppState, user: UserProfile) -> AppResult<AuthResponse> {
    let token = state
        .jwt
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(AuthResponse { token, user })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/customer/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    validate(&req)?;
    check_password(&req.password)?;

    let email = normalize_email(&req.email);
    if users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let password_hash = hash(&req.password)?;
    let user = users::create(
        &state.pool,
        users::NewUser {
            name: req.name.trim(),
            email: &email,
            phone: non_empty(req.phone.as_deref()),
            address: non_empty(req.address.as_deref()),
            password_hash: &password_hash,
            role: Role::Customer,
        },
    )
    .await
    .map_err(|e| match e {
        // Lost a race with a concurrent registration
        RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyRegistered),
        other => other.into(),
    })?;

    tracing::info!(user_id = user.id, "Customer registered");
    Ok(ApiResponse::success(issue(&state, user)?))
}

async fn authenticate(state: &AppState, req: &LoginRequest) -> AppResult<UserProfile> {
    let found = users::find_by_email(&state.pool, &req.email).await?;
    match found {
        Some(user) if verify_password(&req.password, &user.password_hash) => Ok(user.profile),
        _ => {
            security_log!(WARN, "login_failed", email = %normalize_email(&req.email));
            Err(AppError::invalid_credentials())
        }
    }
}

/// POST /api/customer/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = authenticate(&state, &req).await?;
    Ok(ApiResponse::success(issue(&state, user)?))
}

/// POST /api/admin/auth/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = authenticate(&state, &req).await?;
    if user.role != Role::Admin {
        security_log!(WARN, "admin_login_denied", user_id = user.id);
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    tracing::info!(user_id = user.id, "Admin logged in");
    Ok(ApiResponse::success(issue(&state, user)?))
}

/// GET /api/customer/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<UserProfile>> {
    Ok(ApiResponse::success(
        users::get_profile(&state.pool, user.id).await?,
    ))
}

/// PUT /api/customer/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ProfileUpdate>,
) -> AppResult<ApiResponse<UserProfile>> {
    validate(&req)?;
    let password_hash = match req.password.as_deref() {
        Some(password) => {
            check_password(password)?;
            Some(hash(password)?)
        }
        None => None,
    };
    let profile =
        users::update_profile(&state.pool, user.id, &req, password_hash.as_deref()).await?;
    Ok(ApiResponse::success(profile))
}
