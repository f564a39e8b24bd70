//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ErrorKind;
use crate::domain::media::AudioRecording;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Missing speech-to-text API key. Set GROQ_API_KEY or run 'voice-consult config set groq_api_key <key>'")]
    MissingApiKey,

    #[error("Invalid speech-to-text API key")]
    InvalidApiKey,

    #[error("Unusable audio input: {0}")]
    InvalidAudio(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Speech-to-text request timed out")]
    Timeout,

    #[error("Speech-to-text service error: {0}")]
    ServerError(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Empty transcription response")]
    EmptyResponse,
}

impl TranscriptionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => ErrorKind::Authentication,
            Self::InvalidAudio(_) => ErrorKind::InvalidInput,
            Self::RateLimited
            | Self::Timeout
            | Self::ServerError(_)
            | Self::RequestFailed(_)
            | Self::ApiError(_) => ErrorKind::Service,
            Self::ParseError(_) | Self::EmptyResponse => ErrorKind::MalformedResponse,
        }
    }

    /// Transient provider failures worth another attempt
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ServerError(_) | Self::RateLimited | Self::RequestFailed(_)
        )
    }
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a recorded utterance.
    ///
    /// # Returns
    /// The recognized text, never empty, or an error
    async fn transcribe(&self, audio: &AudioRecording) -> Result<String, TranscriptionError>;
}

#[async_trait]
impl Transcriber for Box<dyn Transcriber> {
    async fn transcribe(&self, audio: &AudioRecording) -> Result<String, TranscriptionError> {
        self.as_ref().transcribe(audio).await
    }
}
