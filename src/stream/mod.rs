//! Track selection core: catalog normalization, audio/subtitle selection,
//! metadata projection and remux plan assembly.

pub mod audio;
pub mod catalog;
pub mod metadata;
pub mod plan;
pub mod subtitle;

use crate::config::PriorityConfig;
use std::path::PathBuf;

pub use audio::select_audio;
pub use catalog::{
    normalize_language, CodecType, ExternalSubtitle, ProbeOutput, StreamCatalog, StreamRecord,
};
pub use metadata::{build_track_metadata, Disposition, TrackDirective, TrackMetadata};
pub use plan::{DirectiveValue, InputRef, RemuxPlan};
pub use subtitle::select_subtitles;

/// Codec name that triggers external subtitle injection.
pub const SUBRIP_CODEC: &str = "subrip";

/// Short codec names used in generated track titles.
pub fn display_codec_name(codec: &str) -> &str {
    match codec {
        "hdmv_pgs_subtitle" => "pgs",
        "pcm_s16be" => "pcm",
        other => other,
    }
}

pub(crate) fn track_title(language: &str, codec: &str) -> String {
    format!("{} {}", language.to_uppercase(), display_codec_name(codec))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecMode {
    Copy,
    Convert { codec: String, bitrate: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAudio {
    pub source_index: usize,
    pub codec_name: String,
    pub language: String,
    pub title: String,
    pub mode: CodecMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleSource {
    Native { index: usize },
    External { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSubtitle {
    pub source: SubtitleSource,
    pub codec_name: String,
    pub language: String,
    pub title: String,
}

/// Ordered selections for one file. Output position equals vector position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionResult {
    pub ordered_audio: Vec<SelectedAudio>,
    pub ordered_subtitles: Vec<SelectedSubtitle>,
}

impl SelectionResult {
    pub fn injected_external(&self) -> Option<&PathBuf> {
        self.ordered_subtitles.iter().find_map(|s| match &s.source {
            SubtitleSource::External { path } => Some(path),
            SubtitleSource::Native { .. } => None,
        })
    }
}

/// Runs both selectors over a catalog.
pub fn select_tracks(
    catalog: &StreamCatalog,
    external: Option<&ExternalSubtitle>,
    config: &PriorityConfig,
) -> SelectionResult {
    SelectionResult {
        ordered_audio: select_audio(&catalog.audio, config),
        ordered_subtitles: select_subtitles(&catalog.subtitles, external, config),
    }
}
