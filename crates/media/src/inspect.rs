//! Header-only image sniffing.
//!
//! Only the header is decoded, so this is cheap even for large uploads.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::MediaError;

/// Formats accepted for product photos.
pub const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// What the header says about an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// Detect the format from magic bytes and read the dimensions.
pub fn inspect_image(bytes: &[u8]) -> Result<ImageInfo, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::UnsupportedImage("file is empty".into()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MediaError::UnsupportedImage(e.to_string()))?;

    let format = reader
        .format()
        .filter(|f| ACCEPTED_FORMATS.contains(f))
        .ok_or_else(|| {
            MediaError::UnsupportedImage("expected a PNG, JPEG, WebP or GIF image".into())
        })?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| MediaError::UnsupportedImage(e.to_string()))?;

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}
