//! Bounded retry with exponential backoff for transient transcription failures

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::media::AudioRecording;

use super::ports::{Transcriber, TranscriptionError};

/// Retry policy for provider calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay cap
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before retry number `attempt` (0-based):
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Transcriber decorator that retries retryable errors.
pub struct RetryingTranscriber<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transcriber> RetryingTranscriber<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transcriber> Transcriber for RetryingTranscriber<T> {
    async fn transcribe(&self, audio: &AudioRecording) -> Result<String, TranscriptionError> {
        let mut attempt = 0;
        loop {
            match self.inner.transcribe(audio).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "transcription failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
