//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::consultation::SpeechProvider;

/// voice-consult - spoken medical consultation with optional image analysis
#[derive(Parser, Debug)]
#[command(name = "voice-consult")]
#[command(version)]
#[command(about = "Transcribe a spoken question, analyze an image and speak the answer")]
#[command(long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    /// Recorded question (mp3, wav, ogg, webm, m4a, flac)
    #[arg(short = 'a', long, value_name = "PATH", required = true)]
    pub audio: Option<PathBuf>,

    /// Image to analyze alongside the question
    #[arg(short = 'i', long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Directory for the spoken reply
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Speech provider for the reply
    #[arg(short = 't', long, value_name = "PROVIDER")]
    pub tts: Option<TtsArg>,

    /// Fall back to the other speech provider if the first one fails
    #[arg(long)]
    pub fallback: bool,

    /// Request timeout (e.g., 30s, 1m, 1m30s)
    #[arg(long, value_name = "TIME")]
    pub timeout: Option<String>,

    /// Retries for transient transcription failures
    #[arg(long, value_name = "N")]
    pub stt_retries: Option<u32>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Speech provider argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TtsArg {
    Local,
    #[value(name = "elevenlabs")]
    ElevenLabs,
}

impl From<TtsArg> for SpeechProvider {
    fn from(arg: TtsArg) -> Self {
        match arg {
            TtsArg::Local => SpeechProvider::Local,
            TtsArg::ElevenLabs => SpeechProvider::ElevenLabs,
        }
    }
}

/// Resolved options for one consultation run
#[derive(Debug, Clone)]
pub struct ConsultOptions {
    pub audio: PathBuf,
    pub image: Option<PathBuf>,
    pub json: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "groq_api_key",
    "elevenlabs_api_key",
    "stt_model",
    "vision_model",
    "language",
    "tts_provider",
    "tts_fallback",
    "output_dir",
    "timeout",
    "stt_retries",
    "elevenlabs.voice_id",
    "elevenlabs.model_id",
    "espeak.binary",
    "espeak.voice",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
