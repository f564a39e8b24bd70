//! Audio value objects

use std::fmt;
use std::path::{Path, PathBuf};

/// Audio container formats accepted for upload or produced by synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    #[default]
    Mp3,
    Wav,
    Ogg,
    Webm,
    M4a,
    Flac,
}

impl AudioMimeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
            Self::M4a => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::M4a => "m4a",
            Self::Flac => "flac",
        }
    }

    /// Guess the format from a file extension, falling back to MP3
    /// (the recorder's default container).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("wav") => Self::Wav,
            Some("ogg") | Some("opus") => Self::Ogg,
            Some("webm") => Self::Webm,
            Some("m4a") | Some("mp4") => Self::M4a,
            Some("flac") => Self::Flac,
            _ => Self::Mp3,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded utterance on disk, consumed once by the transcriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRecording {
    path: PathBuf,
    mime_type: AudioMimeType,
}

impl AudioRecording {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = AudioMimeType::from_path(&path);
        Self { path, mime_type }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// File name to present in a multipart upload
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("audio.{}", self.mime_type.extension()))
    }
}
