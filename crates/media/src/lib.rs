//! Image hosting for product photos.
//!
//! The API layer talks to an [`ImageHost`]; [`cloudinary::CloudinaryHost`]
//! is the production implementation. Uploads are sniffed with
//! [`inspect::inspect_image`] before they leave the server.

pub mod cloudinary;
pub mod error;
pub mod host;
pub mod inspect;

pub use error::MediaError;
pub use host::{ImageHost, UploadRequest, UploadedImage};
