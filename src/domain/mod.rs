//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod consultation;
pub mod duration;
pub mod error;
pub mod media;

// Re-export common types
pub use config::AppConfig;
pub use consultation::{
    ConsultationOutcome, ConsultationResponse, OutputSlot, PersonaPrompt, RequestId,
    ResponseAudio, ResponseProvenance, SpeechOutcome, SpeechProvider,
};
pub use duration::Duration;
pub use error::*;
pub use media::{AudioMimeType, AudioRecording, EncodedImage, ImageMimeType};
