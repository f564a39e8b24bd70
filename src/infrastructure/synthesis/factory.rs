//! Synthesizer selection from configuration

use std::time::Duration;

use crate::application::ports::SpeechSynthesizer;
use crate::domain::config::AppConfig;
use crate::domain::consultation::SpeechProvider;

use super::elevenlabs::ElevenLabsSynthesizer;
use super::espeak::EspeakSynthesizer;
use super::fallback::FallbackSynthesizer;

/// Everything needed to build the synthesizer chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSettings {
    pub provider: SpeechProvider,
    pub fallback: bool,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_model_id: String,
    pub espeak_binary: String,
    pub espeak_voice: String,
    pub timeout: Duration,
}

impl SynthesisSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: config.tts_provider_or_default(),
            fallback: config.tts_fallback_or_default(),
            elevenlabs_api_key: config.elevenlabs_api_key.clone(),
            elevenlabs_voice_id: config.elevenlabs_voice_or_default().to_string(),
            elevenlabs_model_id: config.elevenlabs_model_or_default().to_string(),
            espeak_binary: config.espeak_binary_or_default().to_string(),
            espeak_voice: config.espeak_voice_or_default().to_string(),
            timeout: config.timeout_or_default().as_std(),
        }
    }

    /// Whether `provider` would fail for lack of a key
    pub fn lacks_credentials(&self, provider: SpeechProvider) -> bool {
        provider.is_remote() && self.elevenlabs_api_key.is_none()
    }
}

fn create_single(provider: SpeechProvider, settings: &SynthesisSettings) -> Box<dyn SpeechSynthesizer> {
    match provider {
        SpeechProvider::ElevenLabs => Box::new(
            ElevenLabsSynthesizer::new(settings.elevenlabs_api_key.clone())
                .with_voice(settings.elevenlabs_voice_id.as_str())
                .with_model(settings.elevenlabs_model_id.as_str())
                .with_timeout(settings.timeout),
        ),
        SpeechProvider::Local => Box::new(
            EspeakSynthesizer::new()
                .with_binary(settings.espeak_binary.as_str())
                .with_voice(settings.espeak_voice.as_str())
                .with_timeout(settings.timeout),
        ),
    }
}

/// Build the configured synthesizer, wrapped in a fallback chain to the
/// other provider when fallback is enabled.
pub fn create_synthesizer(settings: &SynthesisSettings) -> Box<dyn SpeechSynthesizer> {
    if settings.lacks_credentials(settings.provider) {
        tracing::warn!(
            provider = %settings.provider,
            fallback = settings.fallback,
            "remote speech provider selected without an API key"
        );
    }

    let primary = create_single(settings.provider, settings);
    if !settings.fallback {
        return primary;
    }

    let secondary = create_single(settings.provider.alternate(), settings);
    tracing::debug!(
        primary = %settings.provider,
        fallback = %settings.provider.alternate(),
        "speech fallback enabled"
    );
    Box::new(FallbackSynthesizer::new(primary, secondary))
}
