//! Handlers for the `/admin` resource (login, session check, dashboard stats).

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use senso_core::error::CoreError;
use senso_db::models::product::ProductStats;
use senso_db::repositories::ProductRepo;

use crate::auth::jwt::generate_admin_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Missing is treated the same as wrong.
    #[serde(default)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub message: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Payload of `GET /admin/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub authenticated: bool,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/login
///
/// Exchange the admin password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let hash = state
        .config
        .admin_password_hash
        .clone()
        .ok_or_else(|| AppError::NotConfigured("Admin password not configured".into()))?;

    // CPU-bound, so off the async workers.
    let password_valid =
        tokio::task::spawn_blocking(move || verify_password(&input.password, &hash))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification task: {e}")))?
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::warn!("Admin login failed");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    let (token, claims) = generate_admin_token(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(token_id = %claims.jti, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        message: "Login successful",
        expires_in: state.config.jwt.expiry_secs(),
    }))
}

/// GET /api/admin/session
///
/// Lets the admin panel check whether a stored token is still accepted.
pub async fn session(admin: AdminUser) -> AppResult<Json<DataResponse<SessionInfo>>> {
    let expires_at = DateTime::from_timestamp(admin.expires_at, 0)
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;

    Ok(Json(DataResponse::new(SessionInfo {
        authenticated: true,
        expires_at,
    })))
}

/// GET /api/admin/stats
///
/// Catalog totals for the dashboard, hidden products included.
pub async fn stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProductStats>>> {
    let stats = ProductRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse::new(stats)))
}
