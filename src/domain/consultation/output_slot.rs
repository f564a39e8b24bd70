//! Per-request output location

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::domain::media::AudioMimeType;

/// Prefix for synthesized audio files
const FILE_PREFIX: &str = "consultation";

/// Unique identifier of one consultation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where one request's synthesized audio goes.
///
/// The file stem embeds the request id, so concurrent requests sharing an
/// output directory never write the same file. The extension is chosen by
/// whichever synthesizer ends up producing the audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlot {
    dir: PathBuf,
    request_id: RequestId,
}

impl OutputSlot {
    pub fn new(dir: impl Into<PathBuf>, request_id: RequestId) -> Self {
        Self {
            dir: dir.into(),
            request_id,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path for audio of the given format
    pub fn path_for(&self, format: AudioMimeType) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            FILE_PREFIX,
            self.request_id,
            format.extension()
        ))
    }

    /// Scratch path used while a download is still in flight
    pub fn partial_path_for(&self, format: AudioMimeType) -> PathBuf {
        let mut path = self.path_for(format).into_os_string();
        path.push(".part");
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn path_embeds_request_id_and_extension() {
        let id = RequestId::new();
        let slot = OutputSlot::new("/tmp/out", id);
        let path = slot.path_for(AudioMimeType::Mp3);
        assert_eq!(path.parent(), Some(Path::new("/tmp/out")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("consultation-{}.mp3", id));
    }

    #[test]
    fn partial_path_is_sibling() {
        let slot = OutputSlot::new("/tmp/out", RequestId::new());
        let final_path = slot.path_for(AudioMimeType::Mp3);
        let partial = slot.partial_path_for(AudioMimeType::Mp3);
        assert_eq!(partial.parent(), final_path.parent());
        assert!(partial.to_string_lossy().ends_with(".mp3.part"));
    }

    #[test]
    fn distinct_requests_get_distinct_paths() {
        let a = OutputSlot::new("/tmp/out", RequestId::new());
        let b = OutputSlot::new("/tmp/out", RequestId::new());
        assert_ne!(a.path_for(AudioMimeType::Wav), b.path_for(AudioMimeType::Wav));
    }
}
