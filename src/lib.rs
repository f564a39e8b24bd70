//! voice-consult - spoken medical consultation pipeline
//!
//! Takes a recorded question and an optional image, transcribes the
//! question, asks a vision-language model to answer it in a doctor persona
//! and speaks the answer back as an audio file.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (recordings, images, responses, output slots) and errors
//! - **Application**: The consultation use case, retry policy and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Groq, ElevenLabs, espeak-ng, TOML config)
//! - **CLI**: Command-line interface, argument parsing and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
