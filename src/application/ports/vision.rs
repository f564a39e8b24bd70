//! Vision-language model port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ErrorKind;
use crate::domain::media::EncodedImage;

/// Vision model errors
#[derive(Debug, Clone, Error)]
pub enum VisionError {
    #[error("Missing vision API key. Set GROQ_API_KEY or run 'voice-consult config set groq_api_key <key>'")]
    MissingApiKey,

    #[error("Invalid vision API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Vision request timed out")]
    Timeout,

    #[error("Vision service error: {0}")]
    ServerError(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Vision response contained no choices")]
    NoChoices,

    #[error("Vision response was empty")]
    EmptyResponse,

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl VisionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => ErrorKind::Authentication,
            Self::RateLimited
            | Self::Timeout
            | Self::ServerError(_)
            | Self::RequestFailed(_)
            | Self::ApiError(_) => ErrorKind::Service,
            Self::NoChoices | Self::EmptyResponse | Self::ParseError(_) => {
                ErrorKind::MalformedResponse
            }
        }
    }
}

/// Port for multimodal question answering.
///
/// Always called with an image; the no-image case never reaches the model.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Ask the model about an image.
    ///
    /// # Arguments
    /// * `prompt` - Full text part of the message (persona plus transcript)
    /// * `image` - The encoded image, sent after the text
    async fn query(&self, prompt: &str, image: &EncodedImage) -> Result<String, VisionError>;
}

#[async_trait]
impl VisionModel for Box<dyn VisionModel> {
    async fn query(&self, prompt: &str, image: &EncodedImage) -> Result<String, VisionError> {
        self.as_ref().query(prompt, image).await
    }
}
