//! # Auth Handlers
//!
//! Login and logout. Tokens are stateless JWTs carrying the user's role;
//! logout acknowledges and the client discards its token.

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_auth::{encode_jwt, verify_password};
use lib_core::{
    error::{AppError, Result},
    model::store::UserRepository,
    Config, DbPool,
};
use lib_utils::validation::{validate_max_length, validate_not_empty};
use shared::{LoginRequest, LoginResponse, LogoutResponse};
use tracing::{debug, info, warn};

/// Login handler - authenticates a user by name and password.
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    debug!("[LOGIN] Attempt for user: {}", req.name);

    validate_not_empty(&req.name, "name").map_err(AppError::InvalidInput)?;
    validate_max_length(&req.name, 255, "name").map_err(AppError::InvalidInput)?;
    validate_not_empty(&req.password, "password").map_err(AppError::InvalidInput)?;

    let user = UserRepository::find_by_name(&pool, &req.name)
        .await?
        .ok_or_else(|| {
            warn!("[LOGIN] Unknown user: {}", req.name);
            AppError::Unauthorized("Invalid credentials".to_string())
        })?;

    if !user.is_active {
        warn!("[LOGIN] Deactivated account: {}", user.name);
        return Err(AppError::Forbidden("Account is deactivated".to_string()));
    }

    let is_valid = verify_password(&req.password, &user.password_hash)
        .map_err(AppError::Internal)?;

    if !is_valid {
        warn!("[LOGIN] Invalid password for user: {}", user.name);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = encode_jwt(
        user.id,
        user.name.clone(),
        user.role.to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )
    .map_err(AppError::Internal)?;

    info!("[LOGIN] User authenticated: {} (id: {})", user.name, user.id);

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            role: user.role.to_string(),
        }),
    ))
}

/// Logout handler.
///
/// JWTs are not revocable server-side; the response tells the client to
/// discard its copy.
pub async fn logout() -> (StatusCode, Json<LogoutResponse>) {
    (
        StatusCode::OK,
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
