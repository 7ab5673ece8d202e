/// Errors from the image hosting layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The image host answered with a non-2xx status.
    #[error("Image host error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it had none.
        message: String,
    },

    /// The host answered 2xx with a body we could not interpret.
    #[error("Unexpected image host response: {0}")]
    InvalidResponse(String),

    /// The uploaded bytes are not an image format we accept.
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}
