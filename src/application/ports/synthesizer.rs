//! Speech synthesis port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::consultation::{OutputSlot, ResponseAudio, SpeechProvider};
use crate::domain::error::ErrorKind;

/// Speech synthesis errors
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("Missing ElevenLabs API key. Set ELEVENLABS_API_KEY or run 'voice-consult config set elevenlabs_api_key <key>'")]
    MissingApiKey,

    #[error("Invalid ElevenLabs API key")]
    InvalidApiKey,

    #[error("Speech synthesis quota exceeded")]
    QuotaExceeded,

    #[error("Speech synthesis timed out")]
    Timeout,

    #[error("Speech service error: {0}")]
    ServerError(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("{0} not found. Please install espeak-ng.")]
    EngineNotFound(String),

    #[error("Local speech engine failed: {0}")]
    EngineFailed(String),

    #[error("Cannot write audio file: {0}")]
    Io(String),

    #[error("{primary} (fallback also failed: {fallback})")]
    FallbackFailed {
        primary: Box<SynthesisError>,
        fallback: Box<SynthesisError>,
    },
}

impl SynthesisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => ErrorKind::Authentication,
            Self::QuotaExceeded
            | Self::Timeout
            | Self::ServerError(_)
            | Self::RequestFailed(_)
            | Self::ApiError(_)
            | Self::EngineNotFound(_)
            | Self::EngineFailed(_) => ErrorKind::Service,
            Self::Io(_) => ErrorKind::Io,
            Self::FallbackFailed { primary, .. } => primary.kind(),
        }
    }
}

/// Port for text-to-speech
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` into a file inside `slot`, replacing any existing file.
    ///
    /// # Returns
    /// The written file together with the provider that produced it
    async fn synthesize(&self, text: &str, slot: &OutputSlot)
        -> Result<ResponseAudio, SynthesisError>;

    /// The provider this synthesizer tries first
    fn provider(&self) -> SpeechProvider;
}

#[async_trait]
impl SpeechSynthesizer for Box<dyn SpeechSynthesizer> {
    async fn synthesize(
        &self,
        text: &str,
        slot: &OutputSlot,
    ) -> Result<ResponseAudio, SynthesisError> {
        self.as_ref().synthesize(text, slot).await
    }

    fn provider(&self) -> SpeechProvider {
        self.as_ref().provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_failure_reports_both_and_primary_kind() {
        let err = SynthesisError::FallbackFailed {
            primary: Box::new(SynthesisError::QuotaExceeded),
            fallback: Box::new(SynthesisError::EngineNotFound("espeak-ng".into())),
        };
        let msg = err.to_string();
        assert!(msg.contains("quota"));
        assert!(msg.contains("espeak-ng not found"));
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[test]
    fn io_kind() {
        assert_eq!(SynthesisError::Io("denied".into()).kind(), ErrorKind::Io);
        assert_eq!(SynthesisError::MissingApiKey.kind(), ErrorKind::Authentication);
    }
}
