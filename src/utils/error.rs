use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Probe failed for {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    #[error("No {track_type} tracks found in {}", path.display())]
    NoTracks { path: PathBuf, track_type: String },

    #[error("External subtitle injection is enabled but {} does not exist", path.display())]
    InjectionMissing { path: PathBuf },

    #[error("Remux failed: {message}")]
    Remux { message: String },

    #[error("FFmpeg error: {message}")]
    Ffmpeg { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl Error {
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn probe<P: AsRef<Path>, T: Into<String>>(path: P, message: T) -> Self {
        Self::Probe {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn no_tracks<P: AsRef<Path>, T: Into<String>>(path: P, track_type: T) -> Self {
        Self::NoTracks {
            path: path.as_ref().to_path_buf(),
            track_type: track_type.into(),
        }
    }

    pub fn injection_missing<P: AsRef<Path>>(path: P) -> Self {
        Self::InjectionMissing {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn remux<T: Into<String>>(message: T) -> Self {
        Self::Remux {
            message: message.into(),
        }
    }

    pub fn ffmpeg<T: Into<String>>(message: T) -> Self {
        Self::Ffmpeg {
            message: message.into(),
        }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for failures that only affect the file being processed; a batch
    /// run records them and moves on to the next file.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            Self::Probe { .. }
                | Self::NoTracks { .. }
                | Self::InjectionMissing { .. }
                | Self::Remux { .. }
                | Self::Ffmpeg { .. }
                | Self::Io(_)
                | Self::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_file() {
        let err = Error::no_tracks("/media/show.mkv", "audio");
        assert_eq!(err.to_string(), "No audio tracks found in /media/show.mkv");

        let err = Error::injection_missing("/media/show.srt");
        assert!(err.to_string().contains("/media/show.srt"));
    }

    #[test]
    fn test_file_local_classification() {
        assert!(Error::probe("a.mkv", "corrupt").is_file_local());
        assert!(Error::remux("exit 1").is_file_local());
        assert!(Error::injection_missing("a.srt").is_file_local());
        assert!(!Error::config("empty audio_language_priority").is_file_local());
        assert!(!Error::validation("no files").is_file_local());
    }
}
