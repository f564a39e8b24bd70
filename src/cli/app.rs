//! Main app runner for a single consultation

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{ConfigStore, SpeechSynthesizer};
use crate::application::{
    ConsultCallbacks, ConsultationConfig, ConsultationRequest, ConsultationUseCase, RetryPolicy,
    RetryingTranscriber,
};
use crate::domain::config::AppConfig;
use crate::domain::consultation::SpeechProvider;
use crate::domain::duration::Duration;
use crate::domain::error::ConfigError;
use crate::infrastructure::{
    create_synthesizer, FileImageEncoder, GroqTranscriber, GroqVisionModel, SynthesisSettings,
    XdgConfigStore,
};

use super::args::{Cli, ConsultOptions};
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable holding the Groq key (speech-to-text and vision)
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable holding the ElevenLabs key
pub const ELEVENLABS_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Config layer built from command-line flags
pub fn cli_config(cli: &Cli) -> AppConfig {
    AppConfig {
        tts_provider: cli.tts.map(|t| SpeechProvider::from(t).to_string()),
        tts_fallback: if cli.fallback { Some(true) } else { None },
        output_dir: cli.output_dir.clone(),
        timeout: cli.timeout.clone(),
        stt_retries: cli.stt_retries,
        ..AppConfig::empty()
    }
}

/// Config layer built from environment variables
pub fn env_config() -> AppConfig {
    AppConfig {
        groq_api_key: env::var(GROQ_API_KEY_ENV).ok().filter(|s| !s.is_empty()),
        elevenlabs_api_key: env::var(ELEVENLABS_API_KEY_ENV)
            .ok()
            .filter(|s| !s.is_empty()),
        ..AppConfig::empty()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %store.path().display(), "ignoring unreadable config file");
        AppConfig::empty()
    });

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// Reject values the `*_or_default` accessors would silently replace
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(ref timeout) = config.timeout {
        timeout
            .parse::<Duration>()
            .map_err(|e| ConfigError::ValidationError {
                key: "timeout".to_string(),
                message: e.to_string(),
            })?;
    }
    if let Some(ref provider) = config.tts_provider {
        provider
            .parse::<SpeechProvider>()
            .map_err(|e| ConfigError::ValidationError {
                key: "tts_provider".to_string(),
                message: e.to_string(),
            })?;
    }
    Ok(())
}

/// Wire the adapters described by `config` into a use case
pub fn build_use_case(
    config: &AppConfig,
) -> ConsultationUseCase<
    RetryingTranscriber<GroqTranscriber>,
    FileImageEncoder,
    GroqVisionModel,
    Box<dyn SpeechSynthesizer>,
> {
    let timeout = config.timeout_or_default().as_std();

    let transcriber = GroqTranscriber::new(config.groq_api_key.clone())
        .with_model(config.stt_model_or_default())
        .with_language(config.language_or_default())
        .with_timeout(timeout);
    let policy = RetryPolicy::default().with_max_retries(config.stt_retries_or_default());

    let vision = GroqVisionModel::new(config.groq_api_key.clone())
        .with_model(config.vision_model_or_default())
        .with_timeout(timeout);

    let synthesizer = create_synthesizer(&SynthesisSettings::from_config(config));

    ConsultationUseCase::new(
        RetryingTranscriber::new(transcriber, policy),
        FileImageEncoder::new(),
        vision,
        synthesizer,
        ConsultationConfig {
            output_dir: config.output_dir_or_default(),
        },
    )
}

type Hook = Box<dyn Fn() + Send + Sync>;

fn spinner_hook(
    presenter: &Arc<Presenter>,
    action: impl Fn(&Presenter) + Send + Sync + 'static,
) -> Hook {
    let presenter = Arc::clone(presenter);
    Box::new(move || action(&presenter))
}

fn spinner_callbacks(presenter: &Arc<Presenter>, has_image: bool) -> ConsultCallbacks {
    let p = Arc::clone(presenter);
    let on_transcribing_end: Box<dyn Fn(&str) + Send + Sync> =
        Box::new(move |_: &str| p.spinner_success("Transcription complete"));

    ConsultCallbacks {
        on_transcribing_start: Some(spinner_hook(presenter, |p| {
            p.start_spinner("Transcribing...")
        })),
        on_transcribing_end: Some(on_transcribing_end),
        on_analyzing_start: has_image
            .then(|| spinner_hook(presenter, |p| p.start_spinner("Analyzing image..."))),
        on_analyzing_end: has_image
            .then(|| spinner_hook(presenter, |p| p.spinner_success("Analysis complete"))),
        on_synthesizing_start: Some(spinner_hook(presenter, |p| {
            p.start_spinner("Speaking...")
        })),
        on_synthesizing_end: Some(spinner_hook(presenter, |p| p.stop_spinner())),
    }
}

/// Run one consultation and report it
pub async fn run_consultation(options: ConsultOptions, config: &AppConfig) -> ExitCode {
    let presenter = Arc::new(Presenter::new());
    let use_case = build_use_case(config);

    let callbacks = if options.json {
        ConsultCallbacks::default()
    } else {
        spinner_callbacks(&presenter, options.image.is_some())
    };

    let request = ConsultationRequest::new(options.audio, options.image);

    match use_case.execute(request, callbacks).await {
        Ok(outcome) => {
            if options.json {
                if let Err(e) = presenter.consultation_json(&outcome) {
                    presenter.error(&format!("Failed to encode outcome: {}", e));
                    return ExitCode::from(EXIT_ERROR);
                }
            } else {
                presenter.consultation(&outcome);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Consultation failed");
            tracing::debug!(kind = %e.kind(), "consultation aborted");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn cli_flags_become_config() {
        let cli = Cli::parse_from([
            "voice-consult",
            "-a",
            "q.mp3",
            "--tts",
            "local",
            "--fallback",
            "--stt-retries",
            "0",
            "-o",
            "/tmp/replies",
        ]);
        let config = cli_config(&cli);
        assert_eq!(config.tts_provider.as_deref(), Some("local"));
        assert_eq!(config.tts_fallback, Some(true));
        assert_eq!(config.stt_retries, Some(0));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/replies")));
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn absent_flags_do_not_override() {
        let cli = Cli::parse_from(["voice-consult", "-a", "q.mp3"]);
        let file = AppConfig {
            tts_fallback: Some(true),
            tts_provider: Some("local".into()),
            ..AppConfig::empty()
        };
        let merged = AppConfig::defaults().merge(file).merge(cli_config(&cli));
        assert_eq!(merged.tts_fallback, Some(true));
        assert_eq!(merged.tts_provider.as_deref(), Some("local"));
    }

    #[test]
    fn validate_rejects_bad_timeout_and_provider() {
        let bad_timeout = AppConfig {
            timeout: Some("forever".into()),
            ..AppConfig::defaults()
        };
        assert!(matches!(
            validate_config(&bad_timeout),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "timeout"
        ));

        let bad_provider = AppConfig {
            tts_provider: Some("festival".into()),
            ..AppConfig::defaults()
        };
        assert!(validate_config(&bad_provider).is_err());
        assert!(validate_config(&AppConfig::defaults()).is_ok());
    }

    #[test]
    fn use_case_gets_configured_output_dir() {
        let config = AppConfig {
            output_dir: Some(PathBuf::from("/tmp/voice-consult-out")),
            tts_provider: Some("local".into()),
            ..AppConfig::defaults()
        };
        let use_case = build_use_case(&config);
        assert_eq!(
            use_case.config().output_dir,
            PathBuf::from("/tmp/voice-consult-out")
        );
    }
}
