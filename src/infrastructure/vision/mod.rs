//! Vision-language model adapters

pub mod groq;

pub use groq::GroqVisionModel;
