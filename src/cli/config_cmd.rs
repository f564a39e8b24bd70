//! Config command handler

use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, ElevenLabsConfig, EspeakConfig};
use crate::domain::consultation::SpeechProvider;
use crate::domain::duration::Duration;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if is_secret(key) {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn is_secret(key: &str) -> bool {
    key.ends_with("api_key")
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` and store it under `key`
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "groq_api_key" => config.groq_api_key = Some(value.to_string()),
        "elevenlabs_api_key" => config.elevenlabs_api_key = Some(value.to_string()),
        "stt_model" => config.stt_model = Some(value.to_string()),
        "vision_model" => config.vision_model = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "tts_provider" => {
            let provider = value
                .parse::<SpeechProvider>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.tts_provider = Some(provider.to_string());
        }
        "tts_fallback" => {
            config.tts_fallback = Some(
                parse_bool(value)
                    .map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?,
            )
        }
        "output_dir" => config.output_dir = Some(PathBuf::from(value)),
        "timeout" => {
            let duration = value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.timeout = Some(duration.to_string());
        }
        "stt_retries" => {
            config.stt_retries = Some(
                value
                    .parse::<u32>()
                    .map_err(|_| invalid(key, "Value must be a non-negative integer"))?,
            )
        }
        "elevenlabs.voice_id" => {
            config
                .elevenlabs
                .get_or_insert_with(ElevenLabsConfig::default)
                .voice_id = Some(value.to_string())
        }
        "elevenlabs.model_id" => {
            config
                .elevenlabs
                .get_or_insert_with(ElevenLabsConfig::default)
                .model_id = Some(value.to_string())
        }
        "espeak.binary" => {
            config.espeak.get_or_insert_with(EspeakConfig::default).binary =
                Some(value.to_string())
        }
        "espeak.voice" => {
            config.espeak.get_or_insert_with(EspeakConfig::default).voice =
                Some(value.to_string())
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Stored value for display, with API keys masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "groq_api_key" => config.groq_api_key.as_deref().map(mask_api_key),
        "elevenlabs_api_key" => config.elevenlabs_api_key.as_deref().map(mask_api_key),
        "stt_model" => config.stt_model.clone(),
        "vision_model" => config.vision_model.clone(),
        "language" => config.language.clone(),
        "tts_provider" => config.tts_provider.clone(),
        "tts_fallback" => config.tts_fallback.map(|b| b.to_string()),
        "output_dir" => config
            .output_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        "timeout" => config.timeout.clone(),
        "stt_retries" => config.stt_retries.map(|n| n.to_string()),
        "elevenlabs.voice_id" => config.elevenlabs.as_ref().and_then(|e| e.voice_id.clone()),
        "elevenlabs.model_id" => config.elevenlabs.as_ref().and_then(|e| e.model_id.clone()),
        "espeak.binary" => config.espeak.as_ref().and_then(|e| e.binary.clone()),
        "espeak.voice" => config.espeak.as_ref().and_then(|e| e.voice.clone()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
