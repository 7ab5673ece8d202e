//! Admin authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use senso_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// A request carrying a valid admin token.
///
/// Use as an extractor on any handler that requires the admin:
///
/// ```ignore
/// async fn delete_product(_admin: AdminUser, ...) -> AppResult<StatusCode> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// `jti` of the presented token.
    pub token_id: String,
    /// Expiry of the presented token (UTC Unix timestamp).
    pub expires_at: i64,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;
        authenticate(token, state)
    }
}

/// An optional admin: `None` when no `Authorization` header was sent.
///
/// A header that is present but invalid still rejects with 401, so a stale
/// token is never silently downgraded to anonymous access.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<AdminUser>);

impl MaybeAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate(token, state).map(|admin| MaybeAdmin(Some(admin))),
            None => Ok(MaybeAdmin(None)),
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// The bearer token, if an `Authorization` header is present at all.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim()))
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

fn authenticate(token: &str, state: &AppState) -> Result<AdminUser, AppError> {
    let claims = validate_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Rejected admin token");
        unauthorized("Invalid or expired token")
    })?;

    Ok(AdminUser {
        token_id: claims.jti,
        expires_at: claims.exp,
    })
}
