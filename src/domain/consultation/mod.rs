//! Consultation domain module

mod outcome;
mod output_slot;
mod persona_prompt;
mod response;
mod speech_provider;

pub use outcome::{ConsultationOutcome, ResponseAudio, SpeechOutcome};
pub use output_slot::{OutputSlot, RequestId};
pub use persona_prompt::PersonaPrompt;
pub use response::{
    ConsultationResponse, ResponseProvenance, ANALYSIS_UNAVAILABLE, NO_IMAGE_SENTINEL,
};
pub use speech_provider::{SpeechProvider, ALL_SPEECH_PROVIDERS};
