//! Handler for `POST /upload`: forwards an admin-supplied product photo to
//! the configured image host.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use senso_media::inspect::inspect_image;
use senso_media::{UploadRequest, UploadedImage};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// POST /api/upload
///
/// Accepts `multipart/form-data` with a `file` field. The content is sniffed
/// rather than trusting the client's content type; only PNG, JPEG, WebP and
/// GIF are forwarded.
pub async fn upload_image(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<DataResponse<UploadedImage>>> {
    let mut multipart = multipart?;
    let host = state
        .image_host
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Image upload is not configured".into()))?;

    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;
        file = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, bytes) = file
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    if bytes.len() > state.config.upload_max_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {} byte upload limit",
            state.config.upload_max_bytes
        )));
    }

    let info = inspect_image(&bytes)?;
    let file_name = file_name
        .map(|n| sanitize_file_name(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("upload.{}", info.extension()));

    tracing::debug!(
        file_name = %file_name,
        size = bytes.len(),
        width = info.width,
        height = info.height,
        host = host.name(),
        "Forwarding upload",
    );

    let uploaded = host
        .upload(UploadRequest {
            bytes,
            file_name,
            content_type: info.mime_type().to_string(),
        })
        .await?;

    tracing::info!(public_id = %uploaded.public_id, "Image uploaded");

    Ok(Json(DataResponse::new(uploaded)))
}

/// Keep only the final path component and drop characters that are unsafe
/// in a multipart filename.
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_reduced_to_basename() {
        assert_eq!(sanitize_file_name("C:\\photos\\gold.png"), "gold.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("senso gold (1).jpg"), "sensogold1.jpg");
    }
}
