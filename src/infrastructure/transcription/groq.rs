//! Groq (OpenAI-compatible) Whisper transcriber adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::media::AudioRecording;
use crate::infrastructure::http::{self, HttpFailure};

/// Speech-to-text model to use
const DEFAULT_MODEL: &str = "whisper-large-v3";

/// Spoken language hint sent with every request
const DEFAULT_LANGUAGE: &str = "en";

/// Groq OpenAI-compatible API base URL
pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

// Response types for the transcription endpoint

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Whisper transcriber speaking the OpenAI `/audio/transcriptions` protocol
pub struct GroqTranscriber {
    api_key: Option<String>,
    model: String,
    language: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqTranscriber {
    /// Create a transcriber. A missing key is only reported when a
    /// transcription is attempted.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            model: DEFAULT_MODEL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: GROQ_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http::build_client(timeout);
        self
    }

    fn api_url(&self) -> String {
        http::join_url(&self.base_url, "audio/transcriptions")
    }

    /// Read the whole recording; unreadable or empty files are invalid input
    async fn read_audio(audio: &AudioRecording) -> Result<Vec<u8>, TranscriptionError> {
        let bytes = tokio::fs::read(audio.path()).await.map_err(|e| {
            TranscriptionError::InvalidAudio(format!("{}: {}", audio.path().display(), e))
        })?;

        if bytes.is_empty() {
            return Err(TranscriptionError::InvalidAudio(format!(
                "{} is empty",
                audio.path().display()
            )));
        }

        Ok(bytes)
    }

    /// Build the multipart body
    fn build_form(&self, audio: &AudioRecording, bytes: Vec<u8>) -> Result<Form, TranscriptionError> {
        let file = Part::bytes(bytes)
            .file_name(audio.file_name())
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| TranscriptionError::InvalidAudio(e.to_string()))?;

        Ok(Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "json"))
    }

    fn map_failure(failure: HttpFailure) -> TranscriptionError {
        match failure {
            HttpFailure::Unauthorized => TranscriptionError::InvalidApiKey,
            HttpFailure::RateLimited => TranscriptionError::RateLimited,
            HttpFailure::Server(msg) => TranscriptionError::ServerError(msg),
            HttpFailure::Other(msg) => TranscriptionError::ApiError(msg),
        }
    }

    fn map_transport(e: reqwest::Error) -> TranscriptionError {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::RequestFailed(e.to_string())
        }
    }

    /// Extract non-empty text from a response body
    fn extract_text(body: &str) -> Result<String, TranscriptionError> {
        let response: TranscriptionResponse = serde_json::from_str(body)
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        let text = response.text.unwrap_or_default();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::EmptyResponse);
        }

        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl Transcriber for GroqTranscriber {
    async fn transcribe(&self, audio: &AudioRecording) -> Result<String, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::MissingApiKey)?;

        let bytes = Self::read_audio(audio).await?;
        tracing::debug!(
            audio_bytes = bytes.len(),
            model = %self.model,
            "starting transcription"
        );
        let form = self.build_form(audio, bytes)?;

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::map_transport)?;

        if !status.is_success() {
            tracing::error!(status = %status, "transcription API error");
            return Err(Self::map_failure(http::classify_status(status, &body)));
        }

        let text = Self::extract_text(&body)?;
        tracing::info!(chars = text.chars().count(), "transcription complete");
        Ok(text)
    }
}
