use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub show_timestamps: bool,
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_timestamps: true,
            colored_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub update_interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Container extensions picked up from a directory, without the dot
    pub extensions: Vec<String>,
    /// Descend into subdirectories when the input is a directory
    pub recursive: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mkv".to_string()],
            recursive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub move_completed_files: bool,
    pub moved_dir_name: String,
    pub show_stream_info: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            move_completed_files: false,
            moved_dir_name: "moved".to_string(),
            show_stream_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConversionRule {
    pub format: String,
    pub bitrate: String,
    #[serde(default)]
    pub keep_original: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExternalSubtitle {
    pub enabled: bool,
    pub language: String,
    pub extension: String,
}

impl Default for RawExternalSubtitle {
    fn default() -> Self {
        Self {
            enabled: false,
            language: "ger".to_string(),
            extension: "srt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSelectionProfile {
    pub title: Option<String>,
    pub audio_language_priority: Vec<String>,
    pub audio_codec_priority: Vec<String>,
    pub subtitle_language_priority: Vec<String>,
    pub subtitle_codec_priority: Vec<String>,
    pub conversion_rules: BTreeMap<String, RawConversionRule>,
    pub external_subtitle: RawExternalSubtitle,
    pub fallback_language: String,
    pub keep_lone_audio_track: bool,
}

impl Default for RawSelectionProfile {
    fn default() -> Self {
        Self {
            title: None,
            audio_language_priority: Vec::new(),
            audio_codec_priority: Vec::new(),
            subtitle_language_priority: Vec::new(),
            subtitle_codec_priority: Vec::new(),
            conversion_rules: BTreeMap::new(),
            external_subtitle: RawExternalSubtitle::default(),
            fallback_language: "und".to_string(),
            keep_lone_audio_track: false,
        }
    }
}
