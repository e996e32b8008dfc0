use super::{CodecMode, CodecType, SelectionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Default,
    NotDefault,
}

impl Disposition {
    pub fn for_position(position: usize) -> Self {
        if position == 0 {
            Self::Default
        } else {
            Self::NotDefault
        }
    }

    /// Value understood by ffmpeg's `-disposition` option.
    pub fn as_ffmpeg_value(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NotDefault => "0",
        }
    }
}

/// Output labels and codec handling for one track at its final position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDirective {
    pub track_type: CodecType,
    pub position: usize,
    pub title: String,
    pub language: Option<String>,
    pub codec_mode: CodecMode,
    /// Video keeps whatever disposition the source had
    pub disposition: Option<Disposition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub video: TrackDirective,
    pub audio: Vec<TrackDirective>,
    pub subtitles: Vec<TrackDirective>,
}

impl TrackMetadata {
    pub fn iter(&self) -> impl Iterator<Item = &TrackDirective> {
        std::iter::once(&self.video)
            .chain(self.audio.iter())
            .chain(self.subtitles.iter())
    }
}

/// Projects final selection order onto per-track labels. The first track of
/// each type becomes the default one.
pub fn build_track_metadata(selection: &SelectionResult, video_title: &str) -> TrackMetadata {
    let audio = selection
        .ordered_audio
        .iter()
        .enumerate()
        .map(|(position, track)| TrackDirective {
            track_type: CodecType::Audio,
            position,
            title: track.title.clone(),
            language: Some(track.language.clone()),
            codec_mode: track.mode.clone(),
            disposition: Some(Disposition::for_position(position)),
        })
        .collect();

    let subtitles = selection
        .ordered_subtitles
        .iter()
        .enumerate()
        .map(|(position, track)| TrackDirective {
            track_type: CodecType::Subtitle,
            position,
            title: track.title.clone(),
            language: Some(track.language.clone()),
            codec_mode: CodecMode::Copy,
            disposition: Some(Disposition::for_position(position)),
        })
        .collect();

    TrackMetadata {
        video: TrackDirective {
            track_type: CodecType::Video,
            position: 0,
            title: video_title.to_string(),
            language: None,
            codec_mode: CodecMode::Copy,
            disposition: None,
        },
        audio,
        subtitles,
    }
}
