//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: Groq for speech-to-text
//! and vision, ElevenLabs and espeak-ng for speech, TOML files for config.

pub mod config;
pub mod http;
pub mod image;
pub mod logging;
pub mod synthesis;
pub mod transcription;
pub mod vision;

// Re-export adapters
pub use config::XdgConfigStore;
pub use image::FileImageEncoder;
pub use logging::init_tracing;
pub use synthesis::{
    create_synthesizer, ElevenLabsSynthesizer, EspeakSynthesizer, FallbackSynthesizer,
    SynthesisSettings,
};
pub use transcription::GroqTranscriber;
pub use vision::GroqVisionModel;
