//! Consultation use case: speech in, image analysis, speech out

use std::path::PathBuf;

use thiserror::Error;
use tracing::Instrument;

use crate::domain::consultation::{
    ConsultationOutcome, ConsultationResponse, OutputSlot, PersonaPrompt, RequestId,
    ResponseAudio, SpeechOutcome,
};
use crate::domain::error::ErrorKind;
use crate::domain::media::AudioRecording;

use super::ports::{
    ImageEncoder, ImageError, SpeechSynthesizer, SynthesisError, Transcriber,
    TranscriptionError, VisionModel,
};

/// Errors that abort a consultation.
///
/// Vision and synthesis failures never appear here: they degrade the
/// outcome instead of discarding the transcript.
#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Image could not be used: {0}")]
    Image(#[from] ImageError),
}

impl ConsultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transcription(e) => e.kind(),
            Self::Image(e) => e.kind(),
        }
    }
}

/// Process-wide settings injected at construction
#[derive(Debug, Clone)]
pub struct ConsultationConfig {
    /// Directory receiving one audio file per request
    pub output_dir: PathBuf,
}

/// One caller submission
#[derive(Debug, Clone)]
pub struct ConsultationRequest {
    pub audio: AudioRecording,
    pub image: Option<PathBuf>,
}

impl ConsultationRequest {
    pub fn new(audio: impl Into<PathBuf>, image: Option<PathBuf>) -> Self {
        Self {
            audio: AudioRecording::new(audio),
            image,
        }
    }
}

/// Callbacks for progress updates
#[derive(Default)]
pub struct ConsultCallbacks {
    pub on_transcribing_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the transcript
    pub on_transcribing_end: Option<Box<dyn Fn(&str) + Send + Sync>>,
    pub on_analyzing_start: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_analyzing_end: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_synthesizing_start: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_synthesizing_end: Option<Box<dyn Fn() + Send + Sync>>,
}

fn fire(cb: &Option<Box<dyn Fn() + Send + Sync>>) {
    if let Some(cb) = cb {
        cb();
    }
}

/// The consultation pipeline.
///
/// Steps run strictly in order; the use case holds no per-request state and
/// can be shared between concurrent requests.
pub struct ConsultationUseCase<T, I, V, S>
where
    T: Transcriber,
    I: ImageEncoder,
    V: VisionModel,
    S: SpeechSynthesizer,
{
    transcriber: T,
    image_encoder: I,
    vision: V,
    synthesizer: S,
    persona: PersonaPrompt,
    config: ConsultationConfig,
}

impl<T, I, V, S> ConsultationUseCase<T, I, V, S>
where
    T: Transcriber,
    I: ImageEncoder,
    V: VisionModel,
    S: SpeechSynthesizer,
{
    pub fn new(
        transcriber: T,
        image_encoder: I,
        vision: V,
        synthesizer: S,
        config: ConsultationConfig,
    ) -> Self {
        Self {
            transcriber,
            image_encoder,
            vision,
            synthesizer,
            persona: PersonaPrompt,
            config,
        }
    }

    pub fn config(&self) -> &ConsultationConfig {
        &self.config
    }

    /// Run one consultation.
    pub async fn execute(
        &self,
        request: ConsultationRequest,
        callbacks: ConsultCallbacks,
    ) -> Result<ConsultationOutcome, ConsultError> {
        let request_id = RequestId::new();
        let span = tracing::info_span!("consultation", request_id = %request_id);
        self.run(request_id, request, callbacks)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request_id: RequestId,
        request: ConsultationRequest,
        callbacks: ConsultCallbacks,
    ) -> Result<ConsultationOutcome, ConsultError> {
        tracing::info!(
            audio = %request.audio.path().display(),
            has_image = request.image.is_some(),
            "consultation started"
        );

        fire(&callbacks.on_transcribing_start);
        let transcript = self
            .transcriber
            .transcribe(&request.audio)
            .await
            .inspect_err(|e| tracing::error!(error = %e, kind = %e.kind(), "transcription failed"))?;
        if let Some(ref cb) = callbacks.on_transcribing_end {
            cb(&transcript);
        }
        tracing::debug!(chars = transcript.chars().count(), "transcript received");

        let response = match request.image {
            Some(ref image_path) => {
                fire(&callbacks.on_analyzing_start);
                let response = self.analyze(&transcript, image_path).await?;
                fire(&callbacks.on_analyzing_end);
                response
            }
            None => {
                tracing::info!("no image supplied, skipping vision analysis");
                ConsultationResponse::no_image()
            }
        };

        fire(&callbacks.on_synthesizing_start);
        let slot = OutputSlot::new(&self.config.output_dir, request_id);
        let speech = match self.speak(response.text(), &slot).await {
            Ok(audio) => {
                tracing::info!(
                    path = %audio.path().display(),
                    provider = %audio.provider(),
                    "response audio ready"
                );
                SpeechOutcome::Synthesized(audio)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = %e.kind(), "speech synthesis failed");
                SpeechOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        fire(&callbacks.on_synthesizing_end);

        Ok(ConsultationOutcome {
            request_id,
            transcript,
            response,
            speech,
        })
    }

    /// Encode the image and ask the vision model. Encoding failures abort;
    /// model failures degrade to a fixed apology.
    async fn analyze(
        &self,
        transcript: &str,
        image_path: &std::path::Path,
    ) -> Result<ConsultationResponse, ConsultError> {
        let image = self
            .image_encoder
            .encode(image_path)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "image encoding failed"))?;
        tracing::debug!(
            bytes = image.size_bytes(),
            mime = %image.mime_type(),
            "image encoded"
        );

        let prompt = self.persona.compose(transcript);
        match self.vision.query(&prompt, &image).await {
            Ok(text) => Ok(ConsultationResponse::from_model(text)),
            Err(e) => {
                tracing::warn!(error = %e, kind = %e.kind(), "vision analysis failed, degrading response");
                Ok(ConsultationResponse::analysis_unavailable())
            }
        }
    }

    async fn speak(&self, text: &str, slot: &OutputSlot) -> Result<ResponseAudio, SynthesisError> {
        tokio::fs::create_dir_all(slot.dir())
            .await
            .map_err(|e| SynthesisError::Io(format!("{}: {}", slot.dir().display(), e)))?;
        self.synthesizer.synthesize(text, slot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VisionError;
    use crate::domain::consultation::{ResponseProvenance, SpeechProvider};
    use crate::domain::media::{AudioMimeType, EncodedImage, ImageMimeType};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // Mock implementations for testing

    struct MockTranscriber {
        result: Result<String, TranscriptionError>,
    }

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(&self, _audio: &AudioRecording) -> Result<String, TranscriptionError> {
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct MockEncoder {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl ImageEncoder for MockEncoder {
        async fn encode(&self, path: &Path) -> Result<EncodedImage, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ImageError::Empty(path.to_path_buf()));
            }
            Ok(EncodedImage::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ImageMimeType::Jpeg))
        }
    }

    #[derive(Default)]
    struct MockVision {
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl VisionModel for MockVision {
        async fn query(&self, prompt: &str, _image: &EncodedImage) -> Result<String, VisionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(VisionError::ServerError("503".to_string()));
            }
            Ok("Based on what I see, you should rest.".to_string())
        }
    }

    #[derive(Default)]
    struct MockSynthesizer {
        texts: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            slot: &OutputSlot,
        ) -> Result<ResponseAudio, SynthesisError> {
            self.texts.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(SynthesisError::QuotaExceeded);
            }
            Ok(ResponseAudio::new(
                slot.path_for(AudioMimeType::Mp3),
                SpeechProvider::ElevenLabs,
                AudioMimeType::Mp3,
            ))
        }

        fn provider(&self) -> SpeechProvider {
            SpeechProvider::ElevenLabs
        }
    }

    fn transcriber_ok() -> MockTranscriber {
        MockTranscriber {
            result: Ok("I have a headache".to_string()),
        }
    }

    fn use_case(
        transcriber: MockTranscriber,
        encoder: MockEncoder,
        vision: MockVision,
        synthesizer: MockSynthesizer,
    ) -> ConsultationUseCase<MockTranscriber, MockEncoder, MockVision, MockSynthesizer> {
        ConsultationUseCase::new(
            transcriber,
            encoder,
            vision,
            synthesizer,
            ConsultationConfig {
                output_dir: std::env::temp_dir().join("voice-consult-unit"),
            },
        )
    }

    #[tokio::test]
    async fn no_image_uses_sentinel_and_skips_vision() {
        let vision = MockVision::default();
        let vision_calls = Arc::clone(&vision.calls);
        let synth = MockSynthesizer::default();
        let spoken = Arc::clone(&synth.texts);

        let uc = use_case(transcriber_ok(), MockEncoder::default(), vision, synth);
        let outcome = uc
            .execute(ConsultationRequest::new("hello.mp3", None), ConsultCallbacks::default())
            .await
            .unwrap();

        assert_eq!(outcome.transcript, "I have a headache");
        assert_eq!(outcome.response.text(), "no image provided for analysis");
        assert_eq!(outcome.response.provenance(), ResponseProvenance::NoImageSentinel);
        assert_eq!(vision_calls.load(Ordering::SeqCst), 0);
        assert_eq!(*spoken.lock().unwrap(), vec!["no image provided for analysis"]);
    }

    #[tokio::test]
    async fn image_prompt_starts_with_persona() {
        let vision = MockVision::default();
        let prompts = Arc::clone(&vision.prompts);
        let synth = MockSynthesizer::default();
        let spoken = Arc::clone(&synth.texts);

        let uc = use_case(transcriber_ok(), MockEncoder::default(), vision, synth);
        let outcome = uc
            .execute(
                ConsultationRequest::new("hello.mp3", Some(PathBuf::from("rash.jpg"))),
                ConsultCallbacks::default(),
            )
            .await
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], PersonaPrompt.compose("I have a headache"));
        assert_eq!(outcome.response.provenance(), ResponseProvenance::Model);
        assert_eq!(*spoken.lock().unwrap(), vec![outcome.response.text().to_string()]);
    }

    #[tokio::test]
    async fn transcription_failure_aborts_before_anything_else() {
        let encoder = MockEncoder::default();
        let encoder_calls = Arc::clone(&encoder.calls);
        let vision = MockVision::default();
        let vision_calls = Arc::clone(&vision.calls);
        let synth = MockSynthesizer::default();
        let spoken = Arc::clone(&synth.texts);

        let uc = use_case(
            MockTranscriber {
                result: Err(TranscriptionError::ServerError("500".to_string())),
            },
            encoder,
            vision,
            synth,
        );
        let err = uc
            .execute(
                ConsultationRequest::new("hello.mp3", Some(PathBuf::from("rash.jpg"))),
                ConsultCallbacks::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ConsultError::Transcription(_)));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(encoder_calls.load(Ordering::SeqCst), 0);
        assert_eq!(vision_calls.load(Ordering::SeqCst), 0);
        assert!(spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_failure_aborts_before_vision() {
        let vision = MockVision::default();
        let vision_calls = Arc::clone(&vision.calls);
        let encoder = MockEncoder {
            fail: true,
            ..Default::default()
        };

        let uc = use_case(transcriber_ok(), encoder, vision, MockSynthesizer::default());
        let err = uc
            .execute(
                ConsultationRequest::new("hello.mp3", Some(PathBuf::from("empty.jpg"))),
                ConsultCallbacks::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ConsultError::Image(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(vision_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn vision_failure_degrades() {
        let vision = MockVision {
            fail: true,
            ..Default::default()
        };
        let synth = MockSynthesizer::default();
        let spoken = Arc::clone(&synth.texts);

        let uc = use_case(transcriber_ok(), MockEncoder::default(), vision, synth);
        let outcome = uc
            .execute(
                ConsultationRequest::new("hello.mp3", Some(PathBuf::from("rash.jpg"))),
                ConsultCallbacks::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.transcript, "I have a headache");
        assert!(outcome.response.is_degraded());
        assert_ne!(outcome.response.text(), ConsultationResponse::no_image().text());
        assert_eq!(spoken.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn synthesis_failure_keeps_text() {
        let synth = MockSynthesizer {
            fail: true,
            ..Default::default()
        };

        let uc = use_case(transcriber_ok(), MockEncoder::default(), MockVision::default(), synth);
        let outcome = uc
            .execute(ConsultationRequest::new("hello.mp3", None), ConsultCallbacks::default())
            .await
            .unwrap();

        assert!(outcome.speech.synthesis_failed());
        assert!(outcome.audio_path().is_none());
        assert_eq!(outcome.transcript, "I have a headache");
        assert_eq!(outcome.response.text(), "no image provided for analysis");
    }

    #[tokio::test]
    async fn audio_lands_in_request_slot() {
        let uc = use_case(
            transcriber_ok(),
            MockEncoder::default(),
            MockVision::default(),
            MockSynthesizer::default(),
        );
        let outcome = uc
            .execute(ConsultationRequest::new("hello.mp3", None), ConsultCallbacks::default())
            .await
            .unwrap();

        let path = outcome.audio_path().unwrap();
        assert!(path.starts_with(&uc.config().output_dir));
        assert!(path
            .to_string_lossy()
            .contains(&outcome.request_id.to_string()));
    }

    #[tokio::test]
    async fn callbacks_fire_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let push = |name: &'static str| {
            let events = Arc::clone(&events);
            Box::new(move || events.lock().unwrap().push(name)) as Box<dyn Fn() + Send + Sync>
        };
        let transcript_events = Arc::clone(&events);
        let callbacks = ConsultCallbacks {
            on_transcribing_start: Some(push("transcribing")),
            on_transcribing_end: Some(Box::new(move |_text: &str| {
                transcript_events.lock().unwrap().push("transcribed")
            })),
            on_analyzing_start: Some(push("analyzing")),
            on_analyzing_end: Some(push("analyzed")),
            on_synthesizing_start: Some(push("synthesizing")),
            on_synthesizing_end: Some(push("synthesized")),
        };

        let uc = use_case(
            transcriber_ok(),
            MockEncoder::default(),
            MockVision::default(),
            MockSynthesizer::default(),
        );
        uc.execute(
            ConsultationRequest::new("hello.mp3", Some(PathBuf::from("rash.jpg"))),
            callbacks,
        )
        .await
        .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "transcribing",
                "transcribed",
                "analyzing",
                "analyzed",
                "synthesizing",
                "synthesized"
            ]
        );
    }
}
