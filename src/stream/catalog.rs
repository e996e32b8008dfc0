use crate::utils::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Alias table mapping ISO 639-1 codes and 639-2/T variants onto the 639-2/B
/// codes Matroska muxers write.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("de", "ger"),
    ("deu", "ger"),
    ("en", "eng"),
    ("ja", "jpn"),
    ("jap", "jpn"),
    ("fr", "fre"),
    ("fra", "fre"),
    ("es", "spa"),
    ("it", "ita"),
    ("zh", "chi"),
    ("zho", "chi"),
    ("nl", "dut"),
    ("nld", "dut"),
    ("pt", "por"),
    ("ru", "rus"),
    ("ko", "kor"),
    ("sv", "swe"),
    ("pl", "pol"),
    ("cs", "cze"),
    ("ces", "cze"),
    ("el", "gre"),
    ("ell", "gre"),
    ("fi", "fin"),
    ("da", "dan"),
    ("no", "nor"),
    ("nb", "nor"),
    ("hu", "hun"),
    ("tr", "tur"),
    ("ar", "ara"),
    ("he", "heb"),
    ("hi", "hin"),
];

/// Vendor tag family carrying per-track frame counts (mkvmerge writes
/// `NUMBER_OF_FRAMES` or `NUMBER_OF_FRAMES-eng`).
const FRAME_COUNT_TAG: &str = "NUMBER_OF_FRAMES";

/// Normalizes a language tag to its canonical three-letter code.
///
/// Compound tags such as `de-CH` or `jpn-commentary` keep their suffix; only
/// the leading segment goes through the alias table.
pub fn normalize_language(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    let split_at = tag.find(['-', '_']);
    let (head, rest) = match split_at {
        Some(pos) => tag.split_at(pos),
        None => (tag.as_str(), ""),
    };

    let canonical = LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == head)
        .map(|(_, code)| *code)
        .unwrap_or(head);

    format!("{}{}", canonical, rest)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
}

impl CodecType {
    pub fn from_probe(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "subtitle" => Some(Self::Subtitle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `ffprobe -print_format json -show_streams -show_format` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub disposition: ProbeDisposition,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeDisposition {
    #[serde(default)]
    pub default: i64,
    #[serde(default)]
    pub forced: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl ProbeOutput {
    /// Parses ffprobe's JSON output; a malformed document is a probe failure
    /// for `path`.
    pub fn parse<P: AsRef<Path>>(path: P, json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::probe(path, format!("unparseable ffprobe output: {}", e)))
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse().ok())
    }
}

impl ProbeStream {
    /// Exact key first, then the smallest case-insensitive match.
    fn tag(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.tags.get(key) {
            return Some(value.as_str());
        }
        self.tags
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, v)| v.as_str())
    }

    fn frame_count_hint(&self) -> Option<u64> {
        let mut keys: Vec<&String> = self
            .tags
            .keys()
            .filter(|k| k.to_uppercase().contains(FRAME_COUNT_TAG))
            .collect();
        keys.sort();

        keys.first()
            .and_then(|k| self.tags.get(*k))
            .and_then(|v| v.trim().parse().ok())
    }
}

/// One probed track after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Position within the stream list of its own type, in prober order.
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: String,
    pub language: String,
    pub forced: bool,
    pub title: Option<String>,
    pub frame_count_hint: Option<u64>,
}

impl StreamRecord {
    fn from_probe(
        index: usize,
        codec_type: CodecType,
        stream: &ProbeStream,
        fallback_language: &str,
    ) -> Self {
        let language = stream
            .tag("language")
            .filter(|l| !l.trim().is_empty())
            .map(normalize_language)
            .unwrap_or_else(|| normalize_language(fallback_language));

        Self {
            index,
            codec_type,
            codec_name: stream
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            language,
            forced: stream.disposition.forced != 0,
            title: stream.tag("title").map(|t| t.to_string()),
            frame_count_hint: stream.frame_count_hint(),
        }
    }

    /// Case-insensitive check for "forced" in the title tag.
    pub fn title_mentions_forced(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("forced"))
    }
}

/// Per-file stream collections, partitioned by type and re-indexed from 0.
#[derive(Debug, Clone)]
pub struct StreamCatalog {
    pub source: PathBuf,
    pub video: Vec<StreamRecord>,
    pub audio: Vec<StreamRecord>,
    pub subtitles: Vec<StreamRecord>,
    pub duration: Option<f64>,
}

impl StreamCatalog {
    pub fn from_probe<P: AsRef<Path>>(
        source: P,
        probe: &ProbeOutput,
        fallback_language: &str,
    ) -> Self {
        let mut video = Vec::new();
        let mut audio = Vec::new();
        let mut subtitles = Vec::new();

        let mut ordered: Vec<&ProbeStream> = probe.streams.iter().collect();
        ordered.sort_by_key(|s| s.index);

        for stream in ordered {
            let Some(codec_type) = stream.codec_type.as_deref().and_then(CodecType::from_probe)
            else {
                continue;
            };

            let bucket = match codec_type {
                CodecType::Video => &mut video,
                CodecType::Audio => &mut audio,
                CodecType::Subtitle => &mut subtitles,
            };
            let record = StreamRecord::from_probe(bucket.len(), codec_type, stream, fallback_language);
            debug!(
                "{} #{}: {} [{}] forced={} frames={:?} title={:?}",
                codec_type,
                record.index,
                record.codec_name,
                record.language,
                record.forced,
                record.frame_count_hint,
                record.title
            );
            bucket.push(record);
        }

        Self {
            source: source.as_ref().to_path_buf(),
            video,
            audio,
            subtitles,
            duration: probe.duration_seconds(),
        }
    }

    pub fn records(&self, codec_type: CodecType) -> &[StreamRecord] {
        match codec_type {
            CodecType::Video => &self.video,
            CodecType::Audio => &self.audio,
            CodecType::Subtitle => &self.subtitles,
        }
    }

    /// Fails with `NoTracks` for the first listed type that has no records.
    pub fn require(&self, types: &[CodecType]) -> Result<()> {
        match types.iter().find(|t| self.records(**t).is_empty()) {
            Some(missing) => Err(Error::no_tracks(&self.source, missing.as_str())),
            None => Ok(()),
        }
    }
}

/// Companion subtitle file probed separately from the container. It never
/// joins the container's subtitle index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSubtitle {
    pub path: PathBuf,
    pub codec_name: String,
    pub language: String,
    pub title: String,
}

impl ExternalSubtitle {
    pub fn from_probe<P: AsRef<Path>>(path: P, probe: &ProbeOutput, language: &str) -> Result<Self> {
        let path = path.as_ref();
        let stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("subtitle"))
            .ok_or_else(|| Error::probe(path, "no subtitle stream in external subtitle file"))?;

        let language = normalize_language(language);
        Ok(Self {
            path: path.to_path_buf(),
            codec_name: stream
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            title: format!("{} {}", language.to_uppercase(), super::SUBRIP_CODEC),
            language,
        })
    }
}
