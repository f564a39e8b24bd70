//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, ElevenLabsConfig, EspeakConfig, DEFAULT_ELEVENLABS_MODEL_ID,
    DEFAULT_ELEVENLABS_VOICE_ID, DEFAULT_ESPEAK_BINARY, DEFAULT_ESPEAK_VOICE, DEFAULT_LANGUAGE,
    DEFAULT_STT_MODEL, DEFAULT_STT_RETRIES, DEFAULT_VISION_MODEL,
};
