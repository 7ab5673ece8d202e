use async_trait::async_trait;
use serde::Serialize;

use crate::error::MediaError;

/// A file received from the admin panel, ready to forward.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub file_name: String,
    /// MIME type determined by content sniffing, not the client's claim.
    pub content_type: String,
}

/// Where the host stored the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Public HTTPS URL to store on the product.
    pub url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
}

/// A third-party image hosting service.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    async fn upload(&self, request: UploadRequest) -> Result<UploadedImage, MediaError>;
}
