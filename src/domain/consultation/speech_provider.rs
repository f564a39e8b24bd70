//! Speech synthesis provider identifiers

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::InvalidSpeechProviderError;

/// All supported providers
pub const ALL_SPEECH_PROVIDERS: &[SpeechProvider] =
    &[SpeechProvider::Local, SpeechProvider::ElevenLabs];

/// Text-to-speech backends. Selected by configuration and recorded on every
/// produced audio file so a fallback never hides who spoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    /// Offline engine on the local machine (espeak-ng)
    Local,
    /// ElevenLabs neural voices over HTTPS
    #[default]
    ElevenLabs,
}

impl SpeechProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::ElevenLabs => "elevenlabs",
        }
    }

    /// Whether the provider needs network access and credentials
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::ElevenLabs)
    }

    /// The other provider, used as fallback target
    pub const fn alternate(&self) -> Self {
        match self {
            Self::Local => Self::ElevenLabs,
            Self::ElevenLabs => Self::Local,
        }
    }
}

impl FromStr for SpeechProvider {
    type Err = InvalidSpeechProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "espeak" => Ok(Self::Local),
            "elevenlabs" | "eleven" => Ok(Self::ElevenLabs),
            _ => Err(InvalidSpeechProviderError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SpeechProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
