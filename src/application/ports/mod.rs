//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod image_encoder;
pub mod synthesizer;
pub mod transcriber;
pub mod vision;

// Re-export common types
pub use config::ConfigStore;
pub use image_encoder::{ImageEncoder, ImageError};
pub use synthesizer::{SpeechSynthesizer, SynthesisError};
pub use transcriber::{Transcriber, TranscriptionError};
pub use vision::{VisionError, VisionModel};
