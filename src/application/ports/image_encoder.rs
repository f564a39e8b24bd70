//! Image encoding port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ErrorKind;
use crate::domain::media::EncodedImage;

/// Image encoding errors
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("Cannot read image {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Image file is empty: {0}")]
    Empty(PathBuf),

    #[error("Unsupported image format: {0} (expected JPEG, PNG, GIF or WebP)")]
    UnsupportedFormat(PathBuf),
}

impl ImageError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Port for turning an image file into a transport-safe encoding
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    async fn encode(&self, path: &Path) -> Result<EncodedImage, ImageError>;
}
