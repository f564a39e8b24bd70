//! Text-to-speech adapters

pub mod elevenlabs;
pub mod espeak;
pub mod factory;
pub mod fallback;

pub use elevenlabs::{ElevenLabsSynthesizer, ELEVENLABS_API_BASE_URL};
pub use espeak::EspeakSynthesizer;
pub use factory::{create_synthesizer, SynthesisSettings};
pub use fallback::FallbackSynthesizer;
