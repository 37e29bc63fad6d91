//! # Authentication Middleware
//!
//! Validates `Authorization: Bearer <jwt>` headers and injects the
//! authenticated user's [`Claims`] into request extensions. The worker
//! callback route is deliberately NOT behind this middleware; it
//! authenticates with the shared secret instead (see the callback handler).
//!
//! Handlers extract claims with `Extension<Claims>`:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use lib_auth::Claims;
//!
//! async fn protected_handler(Extension(claims): Extension<Claims>) -> String {
//!     format!("Hello, {}!", claims.name)
//! }
//! ```

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use lib_auth::{decode_jwt, Claims};
use lib_core::config::core_config;
use tracing::{debug, warn};

/// Bearer-token authentication middleware.
///
/// - **Valid token**: continues with `Claims` in request extensions
/// - **Missing/invalid token**: `401 Unauthorized`
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("[AUTH] Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let config = core_config();
    let claims = decode_jwt(token, &config.jwt_secret).map_err(|e| {
        warn!("[AUTH] JWT validation failed: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.name, claims.sub);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Admin gate, layered after [`require_auth`].
///
/// Rejects non-admin callers with `403 Forbidden`. The role comes from the
/// token claims, so no database round trip is needed.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = req.extensions().get::<Claims>().ok_or_else(|| {
        warn!("[AUTH] Admin gate reached without authenticated claims");
        StatusCode::UNAUTHORIZED
    })?;

    if !claims.is_admin() {
        warn!("[AUTH] User {} denied admin access", claims.name);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
