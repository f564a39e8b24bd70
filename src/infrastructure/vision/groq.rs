//! Groq (OpenAI-compatible) chat-completions vision adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{VisionError, VisionModel};
use crate::domain::media::EncodedImage;
use crate::infrastructure::http::{self, HttpFailure};
use crate::infrastructure::transcription::GROQ_API_BASE_URL;

/// Multimodal model to use
const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

// Request types for the chat-completions endpoint

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

// Response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Vision model reached through `/chat/completions`
pub struct GroqVisionModel {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqVisionModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
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
        http::join_url(&self.base_url, "chat/completions")
    }

    /// One user message: the text part first, then the image
    fn build_request(&self, prompt: &str, image: &EncodedImage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_uri(),
                        },
                    },
                ],
            }],
        }
    }

    /// Content of the first choice
    fn extract_text(body: &str) -> Result<String, VisionError> {
        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| VisionError::ParseError(e.to_string()))?;

        let choice = response.choices.into_iter().next().ok_or(VisionError::NoChoices)?;
        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        Ok(content)
    }

    fn map_failure(failure: HttpFailure) -> VisionError {
        match failure {
            HttpFailure::Unauthorized => VisionError::InvalidApiKey,
            HttpFailure::RateLimited => VisionError::RateLimited,
            HttpFailure::Server(msg) => VisionError::ServerError(msg),
            HttpFailure::Other(msg) => VisionError::ApiError(msg),
        }
    }

    fn map_transport(e: reqwest::Error) -> VisionError {
        if e.is_timeout() {
            VisionError::Timeout
        } else {
            VisionError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl VisionModel for GroqVisionModel {
    async fn query(&self, prompt: &str, image: &EncodedImage) -> Result<String, VisionError> {
        let api_key = self.api_key.as_deref().ok_or(VisionError::MissingApiKey)?;
        let body = self.build_request(prompt, image);

        tracing::debug!(
            model = %self.model,
            image_bytes = image.size_bytes(),
            "querying vision model"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(Self::map_transport)?;

        if !status.is_success() {
            tracing::error!(status = %status, "vision API error");
            return Err(Self::map_failure(http::classify_status(status, &text)));
        }

        Self::extract_text(&text)
    }
}
