//! Filesystem image encoder

use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{ImageEncoder, ImageError};
use crate::domain::media::{EncodedImage, ImageMimeType};

/// Reads an image from disk and base64-encodes it.
///
/// The format is taken from the file's magic bytes, not its extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageEncoder;

impl FileImageEncoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageEncoder for FileImageEncoder {
    async fn encode(&self, path: &Path) -> Result<EncodedImage, ImageError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImageError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if bytes.is_empty() {
            return Err(ImageError::Empty(path.to_path_buf()));
        }

        let mime_type = ImageMimeType::sniff(&bytes)
            .ok_or_else(|| ImageError::UnsupportedFormat(path.to_path_buf()))?;

        tracing::debug!(
            path = %path.display(),
            mime = %mime_type,
            bytes = bytes.len(),
            "encoded image"
        );
        Ok(EncodedImage::from_bytes(&bytes, mime_type))
    }
}
