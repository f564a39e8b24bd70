//! XDG config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Application directory name under the XDG config root
const APP_DIR: &str = "voice-consult";

/// TOML config file at `$XDG_CONFIG_HOME/voice-consult/config.toml`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{ElevenLabsConfig, EspeakConfig};

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("voice-consult"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_with_sections() {
        let content = r#"
groq_api_key = "gsk-test"
tts_provider = "local"
tts_fallback = true
timeout = "30s"
stt_retries = 0

[elevenlabs]
voice_id = "abc"

[espeak]
voice = "en-us"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.tts_provider.as_deref(), Some("local"));
        assert_eq!(config.tts_fallback, Some(true));
        assert_eq!(config.stt_retries, Some(0));
        assert_eq!(config.elevenlabs_voice_or_default(), "abc");
        assert_eq!(config.espeak_voice_or_default(), "en-us");
        assert_eq!(config.espeak_binary_or_default(), "espeak-ng");
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            XdgConfigStore::parse_toml("stt_retries = \"many\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn toml_preserves_values() {
        let config = AppConfig {
            elevenlabs_api_key: Some("el-key".to_string()),
            timeout: Some("2m".to_string()),
            elevenlabs: Some(ElevenLabsConfig {
                voice_id: Some("v".to_string()),
                model_id: None,
            }),
            espeak: Some(EspeakConfig {
                binary: Some("/usr/bin/espeak-ng".to_string()),
                voice: None,
            }),
            ..Default::default()
        };

        let toml = XdgConfigStore::to_toml(&config).unwrap();
        assert_eq!(XdgConfigStore::parse_toml(&toml).unwrap(), config);
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested").join("config.toml"));

        store.init().await.unwrap();
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());
        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }
}
