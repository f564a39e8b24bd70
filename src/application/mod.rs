//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod consult;
pub mod ports;
pub mod retry;

// Re-export use cases
pub use consult::{
    ConsultCallbacks, ConsultError, ConsultationConfig, ConsultationRequest, ConsultationUseCase,
};
pub use retry::{RetryPolicy, RetryingTranscriber};
