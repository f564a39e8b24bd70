//! Image value objects

use std::fmt;

use base64::Engine;

/// Still-image formats the vision provider accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMimeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Identify the format from the file's leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base64 form of an image, tagged with its MIME type.
/// Lives only for the duration of one vision request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: ImageMimeType,
    payload: String,
    size_bytes: usize,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], mime_type: ImageMimeType) -> Self {
        Self {
            mime_type,
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
            size_bytes: bytes.len(),
        }
    }

    pub fn mime_type(&self) -> ImageMimeType {
        self.mime_type
    }

    /// Size of the original image in bytes
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Render as `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }

    /// Decode the payload back to raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.payload)
    }
}
