//! Results of a consultation request

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::media::AudioMimeType;

use super::output_slot::RequestId;
use super::response::ConsultationResponse;
use super::speech_provider::SpeechProvider;

/// A synthesized audio file and the provider that actually produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseAudio {
    path: PathBuf,
    provider: SpeechProvider,
    #[serde(serialize_with = "serialize_mime")]
    format: AudioMimeType,
}

fn serialize_mime<S: serde::Serializer>(mime: &AudioMimeType, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(mime.as_str())
}

impl ResponseAudio {
    pub fn new(path: impl Into<PathBuf>, provider: SpeechProvider, format: AudioMimeType) -> Self {
        Self {
            path: path.into(),
            provider,
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn provider(&self) -> SpeechProvider {
        self.provider
    }

    pub fn format(&self) -> AudioMimeType {
        self.format
    }
}

/// Whether the spoken reply could be produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpeechOutcome {
    Synthesized(ResponseAudio),
    Failed { reason: String },
}

impl SpeechOutcome {
    pub fn audio(&self) -> Option<&ResponseAudio> {
        match self {
            Self::Synthesized(audio) => Some(audio),
            Self::Failed { .. } => None,
        }
    }

    pub fn synthesis_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Transcript, response and speech for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationOutcome {
    pub request_id: RequestId,
    pub transcript: String,
    pub response: ConsultationResponse,
    pub speech: SpeechOutcome,
}

impl ConsultationOutcome {
    /// Path of the spoken reply, absent when synthesis failed
    pub fn audio_path(&self) -> Option<&Path> {
        self.speech.audio().map(ResponseAudio::path)
    }
}
