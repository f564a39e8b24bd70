//! Primary/secondary synthesizer chain

use async_trait::async_trait;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};
use crate::domain::consultation::{OutputSlot, ResponseAudio, SpeechProvider};

/// Tries `primary`, then `secondary` when the primary fails.
///
/// The returned audio carries the provider that actually produced it.
pub struct FallbackSynthesizer {
    primary: Box<dyn SpeechSynthesizer>,
    secondary: Box<dyn SpeechSynthesizer>,
}

impl FallbackSynthesizer {
    pub fn new(primary: Box<dyn SpeechSynthesizer>, secondary: Box<dyn SpeechSynthesizer>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl SpeechSynthesizer for FallbackSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        slot: &OutputSlot,
    ) -> Result<ResponseAudio, SynthesisError> {
        let primary_err = match self.primary.synthesize(text, slot).await {
            Ok(audio) => return Ok(audio),
            Err(e) => e,
        };

        tracing::warn!(
            primary = %self.primary.provider(),
            fallback = %self.secondary.provider(),
            error = %primary_err,
            "speech synthesis failed, trying fallback provider"
        );

        self.secondary
            .synthesize(text, slot)
            .await
            .map_err(|fallback_err| SynthesisError::FallbackFailed {
                primary: Box::new(primary_err),
                fallback: Box::new(fallback_err),
            })
    }

    fn provider(&self) -> SpeechProvider {
        self.primary.provider()
    }
}
