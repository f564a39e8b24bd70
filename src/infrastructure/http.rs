//! Shared HTTP plumbing for provider adapters

use std::time::Duration;

use reqwest::StatusCode;

/// Longest provider error body echoed back to the user
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Build a client whose every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Provider-agnostic reading of a failed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    /// 401 or 403
    Unauthorized,
    /// 429
    RateLimited,
    /// 5xx
    Server(String),
    /// Any other non-success status
    Other(String),
}

/// Classify a non-success status, keeping a readable message from the body.
pub fn classify_status(status: StatusCode, body: &str) -> HttpFailure {
    let message = format!("HTTP {}: {}", status, error_message(body));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HttpFailure::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => HttpFailure::RateLimited,
        s if s.is_server_error() => HttpFailure::Server(message),
        _ => HttpFailure::Other(message),
    }
}

/// Pull the human-readable part out of a provider error body.
///
/// Understands OpenAI-style `{"error": {"message": ..}}` and ElevenLabs-style
/// `{"detail": {"message": ..}}` / `{"detail": ".."}`; anything else is
/// returned as (truncated) text.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.pointer("/detail/message"),
            value.get("detail"),
            value.get("error"),
            value.get("message"),
        ];
        if let Some(text) = candidates.into_iter().flatten().find_map(|v| v.as_str()) {
            return text.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "Unknown error".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://api.groq.com/openai/v1/", "/audio/transcriptions"),
            "https://api.groq.com/openai/v1/audio/transcriptions"
        );
        assert_eq!(join_url("http://localhost:8080", "x"), "http://localhost:8080/x");
    }

    #[test]
    fn classify_auth_and_rate_limit() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            HttpFailure::Unauthorized
        );
        assert_eq!(classify_status(StatusCode::FORBIDDEN, ""), HttpFailure::Unauthorized);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            HttpFailure::RateLimited
        );
    }

    #[test]
    fn classify_server_and_other() {
        match classify_status(StatusCode::BAD_GATEWAY, "upstream down") {
            HttpFailure::Server(msg) => assert!(msg.contains("502") && msg.contains("upstream down")),
            other => panic!("expected server failure, got {:?}", other),
        }
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, ""),
            HttpFailure::Other(_)
        ));
    }

    #[test]
    fn error_message_openai_shape() {
        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "model not found");
    }

    #[test]
    fn error_message_elevenlabs_shapes() {
        let body = r#"{"detail":{"status":"quota_exceeded","message":"out of credits"}}"#;
        assert_eq!(error_message(body), "out of credits");
        assert_eq!(error_message(r#"{"detail":"Not Found"}"#), "Not Found");
    }

    #[test]
    fn error_message_plain_text_is_truncated() {
        let long = "x".repeat(1000);
        assert_eq!(error_message(&long).len(), MAX_ERROR_BODY_CHARS);
        assert_eq!(error_message("   "), "Unknown error");
    }
}
