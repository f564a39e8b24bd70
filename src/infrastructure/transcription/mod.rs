//! Speech-to-text adapters

pub mod groq;

pub use groq::{GroqTranscriber, GROQ_API_BASE_URL};
