//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::consultation::SpeechProvider;
use crate::domain::duration::Duration;

pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_STT_RETRIES: u32 = 2;
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_ELEVENLABS_MODEL_ID: &str = "eleven_turbo_v2";
pub const DEFAULT_ESPEAK_BINARY: &str = "espeak-ng";
pub const DEFAULT_ESPEAK_VOICE: &str = "en";

/// ElevenLabs-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
}

/// Local espeak-ng configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspeakConfig {
    pub binary: Option<String>,
    pub voice: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub stt_model: Option<String>,
    pub vision_model: Option<String>,
    pub language: Option<String>,
    pub tts_provider: Option<String>,
    pub tts_fallback: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub timeout: Option<String>,
    pub stt_retries: Option<u32>,
    pub elevenlabs: Option<ElevenLabsConfig>,
    pub espeak: Option<EspeakConfig>,
}

impl AppConfig {
    /// Create config with default values.
    /// Credentials and the output directory stay unset: they are machine specific.
    pub fn defaults() -> Self {
        Self {
            groq_api_key: None,
            elevenlabs_api_key: None,
            stt_model: Some(DEFAULT_STT_MODEL.to_string()),
            vision_model: Some(DEFAULT_VISION_MODEL.to_string()),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            tts_provider: Some(SpeechProvider::default().to_string()),
            tts_fallback: Some(false),
            output_dir: None,
            timeout: Some(Duration::default_timeout().to_string()),
            stt_retries: Some(DEFAULT_STT_RETRIES),
            elevenlabs: Some(ElevenLabsConfig {
                voice_id: Some(DEFAULT_ELEVENLABS_VOICE_ID.to_string()),
                model_id: Some(DEFAULT_ELEVENLABS_MODEL_ID.to_string()),
            }),
            espeak: Some(EspeakConfig {
                binary: Some(DEFAULT_ESPEAK_BINARY.to_string()),
                voice: Some(DEFAULT_ESPEAK_VOICE.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            groq_api_key: other.groq_api_key.or(self.groq_api_key),
            elevenlabs_api_key: other.elevenlabs_api_key.or(self.elevenlabs_api_key),
            stt_model: other.stt_model.or(self.stt_model),
            vision_model: other.vision_model.or(self.vision_model),
            language: other.language.or(self.language),
            tts_provider: other.tts_provider.or(self.tts_provider),
            tts_fallback: other.tts_fallback.or(self.tts_fallback),
            output_dir: other.output_dir.or(self.output_dir),
            timeout: other.timeout.or(self.timeout),
            stt_retries: other.stt_retries.or(self.stt_retries),
            elevenlabs: merge_section(self.elevenlabs, other.elevenlabs, |b, o| {
                ElevenLabsConfig {
                    voice_id: o.voice_id.or(b.voice_id),
                    model_id: o.model_id.or(b.model_id),
                }
            }),
            espeak: merge_section(self.espeak, other.espeak, |b, o| EspeakConfig {
                binary: o.binary.or(b.binary),
                voice: o.voice.or(b.voice),
            }),
        }
    }

    pub fn stt_model_or_default(&self) -> &str {
        self.stt_model.as_deref().unwrap_or(DEFAULT_STT_MODEL)
    }

    pub fn vision_model_or_default(&self) -> &str {
        self.vision_model.as_deref().unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Get the speech provider, or the default if not set/invalid
    pub fn tts_provider_or_default(&self) -> SpeechProvider {
        self.tts_provider
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn tts_fallback_or_default(&self) -> bool {
        self.tts_fallback.unwrap_or(false)
    }

    /// Get the timeout as parsed Duration, or default if not set/invalid
    pub fn timeout_or_default(&self) -> Duration {
        self.timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_timeout)
    }

    pub fn stt_retries_or_default(&self) -> u32 {
        self.stt_retries.unwrap_or(DEFAULT_STT_RETRIES)
    }

    /// Directory for synthesized audio; falls back to the user cache dir
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("voice-consult")
        })
    }

    pub fn elevenlabs_voice_or_default(&self) -> &str {
        self.elevenlabs
            .as_ref()
            .and_then(|e| e.voice_id.as_deref())
            .unwrap_or(DEFAULT_ELEVENLABS_VOICE_ID)
    }

    pub fn elevenlabs_model_or_default(&self) -> &str {
        self.elevenlabs
            .as_ref()
            .and_then(|e| e.model_id.as_deref())
            .unwrap_or(DEFAULT_ELEVENLABS_MODEL_ID)
    }

    pub fn espeak_binary_or_default(&self) -> &str {
        self.espeak
            .as_ref()
            .and_then(|e| e.binary.as_deref())
            .unwrap_or(DEFAULT_ESPEAK_BINARY)
    }

    pub fn espeak_voice_or_default(&self) -> &str {
        self.espeak
            .as_ref()
            .and_then(|e| e.voice.as_deref())
            .unwrap_or(DEFAULT_ESPEAK_VOICE)
    }
}

/// Merge an optional nested section field by field
fn merge_section<T>(base: Option<T>, other: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (base, other) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(b), Some(o)) => Some(merge(b, o)),
    }
}
