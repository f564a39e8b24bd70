//! ElevenLabs streaming text-to-speech adapter

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::Serialize;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};
use crate::domain::config::{DEFAULT_ELEVENLABS_MODEL_ID, DEFAULT_ELEVENLABS_VOICE_ID};
use crate::domain::consultation::{OutputSlot, ResponseAudio, SpeechProvider};
use crate::domain::media::AudioMimeType;
use crate::infrastructure::http::{self, HttpFailure};

/// ElevenLabs API base URL
pub const ELEVENLABS_API_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Error status ElevenLabs reports when the character quota is used up
const QUOTA_EXCEEDED_MARKER: &str = "quota_exceeded";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs synthesizer. The MP3 stream is written chunk by chunk to a
/// `.part` file that only replaces the final path once fully received.
pub struct ElevenLabsSynthesizer {
    api_key: Option<String>,
    voice_id: String,
    model_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            voice_id: DEFAULT_ELEVENLABS_VOICE_ID.to_string(),
            model_id: DEFAULT_ELEVENLABS_MODEL_ID.to_string(),
            base_url: ELEVENLABS_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
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
        http::join_url(
            &self.base_url,
            &format!("text-to-speech/{}/stream", self.voice_id),
        )
    }

    fn map_failure(status: StatusCode, body: &str) -> SynthesisError {
        if body.contains(QUOTA_EXCEEDED_MARKER) {
            return SynthesisError::QuotaExceeded;
        }
        match http::classify_status(status, body) {
            HttpFailure::Unauthorized => SynthesisError::InvalidApiKey,
            HttpFailure::RateLimited => SynthesisError::QuotaExceeded,
            HttpFailure::Server(msg) => SynthesisError::ServerError(msg),
            HttpFailure::Other(msg) => SynthesisError::ApiError(msg),
        }
    }

    fn map_transport(e: reqwest::Error) -> SynthesisError {
        if e.is_timeout() {
            SynthesisError::Timeout
        } else {
            SynthesisError::RequestFailed(e.to_string())
        }
    }

    /// Drain the response body into `partial`, returning the byte count
    async fn stream_to_file(
        response: reqwest::Response,
        partial: &Path,
    ) -> Result<u64, SynthesisError> {
        let mut file = File::create(partial)
            .await
            .map_err(|e| SynthesisError::Io(e.to_string()))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Self::map_transport)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| SynthesisError::Io(e.to_string()))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| SynthesisError::Io(e.to_string()))?;

        Ok(written)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        slot: &OutputSlot,
    ) -> Result<ResponseAudio, SynthesisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SynthesisError::MissingApiKey)?;

        let body = SpeechRequest {
            text,
            model_id: &self.model_id,
        };

        tracing::debug!(voice = %self.voice_id, model = %self.model_id, "requesting speech");

        let response = self
            .client
            .post(self.api_url())
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, AudioMimeType::Mp3.as_str())
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "speech API error");
            return Err(Self::map_failure(status, &body));
        }

        let format = AudioMimeType::Mp3;
        let partial = slot.partial_path_for(format);
        let target = slot.path_for(format);

        let written = match Self::stream_to_file(response, &partial).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if written == 0 {
            let _ = fs::remove_file(&partial).await;
            return Err(SynthesisError::ApiError("empty audio stream".to_string()));
        }

        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(SynthesisError::Io(e.to_string()));
        }

        tracing::info!(path = %target.display(), bytes = written, "speech written");
        Ok(ResponseAudio::new(target, SpeechProvider::ElevenLabs, format))
    }

    fn provider(&self) -> SpeechProvider {
        SpeechProvider::ElevenLabs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultation::RequestId;

    #[test]
    fn url_targets_streaming_voice_endpoint() {
        let synth = ElevenLabsSynthesizer::new(Some("k".into())).with_voice("abc123");
        assert_eq!(
            synth.api_url(),
            "https://api.elevenlabs.io/v1/text-to-speech/abc123/stream"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = SpeechRequest {
            text: "Rest and hydrate.",
            model_id: DEFAULT_ELEVENLABS_MODEL_ID,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "Rest and hydrate.");
        assert_eq!(json["model_id"], "eleven_turbo_v2");
    }

    #[test]
    fn quota_is_detected_before_status() {
        let body = r#"{"detail":{"status":"quota_exceeded","message":"This request exceeds your quota."}}"#;
        assert!(matches!(
            ElevenLabsSynthesizer::map_failure(StatusCode::UNAUTHORIZED, body),
            SynthesisError::QuotaExceeded
        ));
        assert!(matches!(
            ElevenLabsSynthesizer::map_failure(StatusCode::UNAUTHORIZED, "{}"),
            SynthesisError::InvalidApiKey
        ));
        assert!(matches!(
            ElevenLabsSynthesizer::map_failure(StatusCode::BAD_GATEWAY, ""),
            SynthesisError::ServerError(_)
        ));
        match ElevenLabsSynthesizer::map_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":{"message":"voice not found"}}"#,
        ) {
            SynthesisError::ApiError(msg) => assert!(msg.contains("voice not found")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_key_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let slot = OutputSlot::new(dir.path(), RequestId::new());

        let err = ElevenLabsSynthesizer::new(None)
            .synthesize("hello", &slot)
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::MissingApiKey));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    #[ignore = "requires ELEVENLABS_API_KEY and network access"]
    async fn speaks_into_slot() {
        let dir = tempfile::tempdir().unwrap();
        let slot = OutputSlot::new(dir.path(), RequestId::new());
        let synth = ElevenLabsSynthesizer::new(std::env::var("ELEVENLABS_API_KEY").ok());

        let audio = synth.synthesize("Please rest.", &slot).await.unwrap();
        assert_eq!(audio.path(), slot.path_for(AudioMimeType::Mp3));
        assert!(audio.path().exists());
    }
}
