//! Domain error types

use std::fmt;

use thiserror::Error;

/// Coarse classification shared by every port error.
///
/// Adapters keep their own detailed variants; callers that only need to
/// decide how to react (abort, degrade, retry) look at the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing, empty or corrupt local input file
    InvalidInput,
    /// Missing or rejected provider credentials
    Authentication,
    /// Remote provider failure: timeout, 5xx, quota, transport
    Service,
    /// Provider answered successfully but the payload was unusable
    MalformedResponse,
    /// Local filesystem write failure
    Io,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Authentication => "authentication",
            Self::Service => "service",
            Self::MalformedResponse => "malformed_response",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected units ms, s and m, optionally combined (e.g., 500ms, 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown speech provider is requested
#[derive(Debug, Clone, Error)]
#[error("Invalid speech provider: \"{input}\". Valid providers are: local, elevenlabs")]
pub struct InvalidSpeechProviderError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
