use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use senso_core::error::CoreError;
use senso_media::MediaError;
use serde_json::json;

/// Message returned when a product slug collides with an existing one.
pub const DUPLICATE_SLUG_MESSAGE: &str = "Product with this slug already exists";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{"success": false, "error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Image host error: {0}")]
    Media(#[from] MediaError),

    /// Malformed or oversized multipart body.
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid multipart request: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A feature whose configuration is missing; the message is shown to
    /// the caller so operators can tell what to set.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// An optional backing service is not available.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Image host ---
            AppError::Media(err) => classify_media_error(err),

            // --- Extractor rejections ---
            AppError::Multipart(err) => rejected(err.status(), err.body_text()),
            AppError::MultipartRejection(rej) => rejected(rej.status(), rej.body_text()),
            AppError::Json(rej) => rejected(rej.status(), rej.body_text()),
            AppError::Query(rej) => rejected(rej.status(), rej.body_text()),
            AppError::Path(rej) => rejected(rej.status(), rej.body_text()),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotConfigured(msg) => {
                tracing::error!(what = %msg, "Feature not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NOT_CONFIGURED",
                    msg.clone(),
                )
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// A request axum could not parse. The status comes from the rejection.
fn rejected(status: StatusCode, message: String) -> (StatusCode, &'static str, String) {
    (status, code_for_status(status), message)
}

fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "BAD_REQUEST",
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - A duplicate product slug maps to 400.
/// - Other unique violations on `uq_*` constraints map to 409.
/// - Check violations (23514) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    return unique_violation(constraint);
                }
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value rejected by constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn unique_violation(constraint: &str) -> (StatusCode, &'static str, String) {
    match constraint {
        "uq_products_slug" => (
            StatusCode::BAD_REQUEST,
            "DUPLICATE_SLUG",
            DUPLICATE_SLUG_MESSAGE.to_string(),
        ),
        other => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {other}"),
        ),
    }
}

/// Image-host failures are the host's fault (502) except for files we
/// refused to forward, which are the caller's (415).
fn classify_media_error(err: &MediaError) -> (StatusCode, &'static str, String) {
    match err {
        MediaError::UnsupportedImage(reason) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            format!("Unsupported image: {reason}"),
        ),
        MediaError::Api { status, message } => {
            tracing::error!(status, error = %message, "Image host rejected upload");
            (
                StatusCode::BAD_GATEWAY,
                "UPLOAD_FAILED",
                format!("Image upload failed: {message}"),
            )
        }
        MediaError::Request(e) => {
            tracing::error!(error = %e, "Image host unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPLOAD_FAILED",
                "Image host unreachable".to_string(),
            )
        }
        MediaError::InvalidResponse(e) => {
            tracing::error!(error = %e, "Unexpected image host response");
            (
                StatusCode::BAD_GATEWAY,
                "UPLOAD_FAILED",
                "Unexpected response from image host".to_string(),
            )
        }
    }
}
