//! espeak-ng local speech synthesis adapter

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};
use crate::domain::config::{DEFAULT_ESPEAK_BINARY, DEFAULT_ESPEAK_VOICE};
use crate::domain::consultation::{OutputSlot, ResponseAudio, SpeechProvider};
use crate::domain::media::AudioMimeType;

/// Upper bound for one synthesis run
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Offline synthesizer driving the `espeak-ng` binary.
///
/// Text goes in on stdin, a WAV file comes out next to the final path and is
/// renamed into place once the engine exits cleanly.
pub struct EspeakSynthesizer {
    binary: String,
    voice: String,
    timeout: Duration,
}

impl EspeakSynthesizer {
    pub fn new() -> Self {
        Self {
            binary: DEFAULT_ESPEAK_BINARY.to_string(),
            voice: DEFAULT_ESPEAK_VOICE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_args(&self, output: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.voice.clone(),
            "--stdin".to_string(),
            "-w".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    async fn run_engine(&self, text: &str, output: &Path) -> Result<(), SynthesisError> {
        let mut child = Command::new(&self.binary)
            .args(self.build_args(output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SynthesisError::EngineNotFound(self.binary.clone())
                } else {
                    SynthesisError::EngineFailed(e.to_string())
                }
            })?;

        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            // stdin is dropped on return, closing the pipe so the engine sees EOF
            match stdin.write_all(text.as_bytes()).await {
                // An engine that quits early reports why through its exit status
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let (fed, output) = tokio::time::timeout(self.timeout, async {
            tokio::join!(feed, child.wait_with_output())
        })
        .await
        .map_err(|_| SynthesisError::Timeout)?;
        let output = output.map_err(|e| SynthesisError::EngineFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SynthesisError::EngineFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        fed.map_err(|e| SynthesisError::EngineFailed(e.to_string()))?;

        Ok(())
    }
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        slot: &OutputSlot,
    ) -> Result<ResponseAudio, SynthesisError> {
        let format = AudioMimeType::Wav;
        let partial = slot.partial_path_for(format);
        let target = slot.path_for(format);

        tracing::debug!(binary = %self.binary, voice = %self.voice, "running local speech engine");

        if let Err(e) = self.run_engine(text, &partial).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(SynthesisError::Io(e.to_string()));
        }

        tracing::info!(path = %target.display(), "local speech written");
        Ok(ResponseAudio::new(target, SpeechProvider::Local, format))
    }

    fn provider(&self) -> SpeechProvider {
        SpeechProvider::Local
    }
}
