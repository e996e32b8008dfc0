use super::{
    build_track_metadata, CodecMode, CodecType, SelectionResult, StreamCatalog, SubtitleSource,
    TrackDirective, TrackMetadata,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// A stream in one of the plan's input files, e.g. `0:a:2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRef {
    pub input: usize,
    pub track_type: CodecType,
    pub index: usize,
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.track_type {
            CodecType::Video => "v",
            CodecType::Audio => "a",
            CodecType::Subtitle => "s",
        };
        write!(f, "{}:{}:{}", self.input, kind, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    Single(String),
    List(Vec<String>),
}

impl DirectiveValue {
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

/// Everything the remux engine needs for one file. Tracks are listed in
/// output order: the first video stream, then audio, then subtitles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxPlan {
    pub source: PathBuf,
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub tracks: Vec<InputRef>,
    pub metadata: TrackMetadata,
    /// Passed as `-max_interleave_delta`; 0 keeps source packet interleaving
    pub max_interleave_delta: u32,
}

impl RemuxPlan {
    pub fn assemble<P: AsRef<Path>>(
        catalog: &StreamCatalog,
        selection: &SelectionResult,
        output: P,
    ) -> Self {
        let mut inputs = vec![catalog.source.clone()];
        if let Some(external) = selection.injected_external() {
            inputs.push(external.clone());
        }

        let mut tracks = vec![InputRef {
            input: 0,
            track_type: CodecType::Video,
            index: 0,
        }];

        tracks.extend(selection.ordered_audio.iter().map(|audio| InputRef {
            input: 0,
            track_type: CodecType::Audio,
            index: audio.source_index,
        }));

        tracks.extend(selection.ordered_subtitles.iter().map(|sub| match sub.source {
            SubtitleSource::Native { index } => InputRef {
                input: 0,
                track_type: CodecType::Subtitle,
                index,
            },
            SubtitleSource::External { .. } => InputRef {
                input: 1,
                track_type: CodecType::Subtitle,
                index: 0,
            },
        }));

        Self {
            source: catalog.source.clone(),
            output: output.as_ref().to_path_buf(),
            inputs,
            tracks,
            metadata: build_track_metadata(selection, &video_title(&catalog.source)),
            max_interleave_delta: 0,
        }
    }

    pub fn audio_count(&self) -> usize {
        self.metadata.audio.len()
    }

    pub fn subtitle_count(&self) -> usize {
        self.metadata.subtitles.len()
    }

    /// Flat option map in ffmpeg key syntax, without leading dashes.
    pub fn flat_directives(&self) -> Vec<(String, DirectiveValue)> {
        let mut directives = vec![
            ("c:v".to_string(), DirectiveValue::Single("copy".to_string())),
            ("c:a".to_string(), DirectiveValue::Single("copy".to_string())),
            ("c:s".to_string(), DirectiveValue::Single("copy".to_string())),
        ];

        for track in &self.metadata.audio {
            if let CodecMode::Convert { codec, bitrate } = &track.codec_mode {
                directives.push((
                    format!("c:a:{}", track.position),
                    DirectiveValue::Single(codec.clone()),
                ));
                directives.push((
                    format!("b:a:{}", track.position),
                    DirectiveValue::Single(bitrate.clone()),
                ));
            }
        }

        for track in self.metadata.iter() {
            directives.extend(track_directives(track));
        }

        directives.push((
            "max_interleave_delta".to_string(),
            DirectiveValue::Single(self.max_interleave_delta.to_string()),
        ));

        directives
    }

    /// Renders the plan as ffmpeg arguments (inputs, maps, options, output).
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        for track in &self.tracks {
            args.push("-map".to_string());
            args.push(track.to_string());
        }

        for (key, value) in self.flat_directives() {
            for v in value.values() {
                args.push(format!("-{}", key));
                args.push(v.clone());
            }
        }

        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

fn track_directives(track: &TrackDirective) -> Vec<(String, DirectiveValue)> {
    let kind = match track.track_type {
        CodecType::Video => "v",
        CodecType::Audio => "a",
        CodecType::Subtitle => "s",
    };

    let mut tags = vec![format!("title={}", track.title)];
    if let Some(language) = &track.language {
        tags.push(format!("language={}", language));
    }

    let metadata = if tags.len() == 1 {
        DirectiveValue::Single(tags.remove(0))
    } else {
        DirectiveValue::List(tags)
    };

    let mut directives = vec![(format!("metadata:s:{}:{}", kind, track.position), metadata)];
    if let Some(disposition) = track.disposition {
        directives.push((
            format!("disposition:{}:{}", kind, track.position),
            DirectiveValue::Single(disposition.as_ffmpeg_value().to_string()),
        ));
    }
    directives
}

fn video_title(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{SelectedAudio, SelectedSubtitle};
    use pretty_assertions::assert_eq;

    fn catalog() -> StreamCatalog {
        StreamCatalog {
            source: PathBuf::from("/media/Show S01E01.mkv"),
            video: Vec::new(),
            audio: Vec::new(),
            subtitles: Vec::new(),
            duration: None,
        }
    }

    fn selection() -> SelectionResult {
        SelectionResult {
            ordered_audio: vec![
                SelectedAudio {
                    source_index: 1,
                    codec_name: "ac3".to_string(),
                    language: "jpn".to_string(),
                    title: "JPN ac3".to_string(),
                    mode: CodecMode::Convert {
                        codec: "ac3".to_string(),
                        bitrate: "640k".to_string(),
                    },
                },
                SelectedAudio {
                    source_index: 1,
                    codec_name: "dts".to_string(),
                    language: "jpn".to_string(),
                    title: "JPN dts".to_string(),
                    mode: CodecMode::Copy,
                },
            ],
            ordered_subtitles: vec![
                SelectedSubtitle {
                    source: SubtitleSource::External {
                        path: PathBuf::from("/media/Show S01E01.srt"),
                    },
                    codec_name: "subrip".to_string(),
                    language: "ger".to_string(),
                    title: "GER subrip".to_string(),
                },
                SelectedSubtitle {
                    source: SubtitleSource::Native { index: 3 },
                    codec_name: "ass".to_string(),
                    language: "eng".to_string(),
                    title: "ENG ass".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_assemble_orders_tracks_and_inputs() {
        let plan = RemuxPlan::assemble(&catalog(), &selection(), "/media/Show S01E01_1.mkv");

        assert_eq!(
            plan.inputs,
            vec![
                PathBuf::from("/media/Show S01E01.mkv"),
                PathBuf::from("/media/Show S01E01.srt")
            ]
        );
        let maps: Vec<String> = plan.tracks.iter().map(|t| t.to_string()).collect();
        assert_eq!(maps, vec!["0:v:0", "0:a:1", "0:a:1", "1:s:0", "0:s:3"]);
        assert_eq!(plan.metadata.video.title, "Show S01E01");
        assert_eq!(plan.audio_count(), 2);
        assert_eq!(plan.subtitle_count(), 2);
    }

    #[test]
    fn test_flat_directives() {
        let plan = RemuxPlan::assemble(&catalog(), &selection(), "/media/out.mkv");
        let directives = plan.flat_directives();
        let get = |key: &str| {
            directives
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        assert_eq!(get("c:a"), Some(DirectiveValue::Single("copy".to_string())));
        assert_eq!(get("c:a:0"), Some(DirectiveValue::Single("ac3".to_string())));
        assert_eq!(get("b:a:0"), Some(DirectiveValue::Single("640k".to_string())));
        assert_eq!(get("c:a:1"), None);
        assert_eq!(
            get("metadata:s:a:1"),
            Some(DirectiveValue::List(vec![
                "title=JPN dts".to_string(),
                "language=jpn".to_string()
            ]))
        );
        assert_eq!(
            get("metadata:s:v:0"),
            Some(DirectiveValue::Single("title=Show S01E01".to_string()))
        );
        assert_eq!(get("disposition:a:0"), Some(DirectiveValue::Single("default".to_string())));
        assert_eq!(get("disposition:s:1"), Some(DirectiveValue::Single("0".to_string())));
        assert_eq!(get("disposition:v:0"), None);
        assert_eq!(
            directives.last(),
            Some(&(
                "max_interleave_delta".to_string(),
                DirectiveValue::Single("0".to_string())
            ))
        );
    }

    #[test]
    fn test_ffmpeg_args_render_inputs_maps_and_output() {
        let plan = RemuxPlan::assemble(&catalog(), &selection(), "/media/out.mkv");
        let args = plan.to_ffmpeg_args();

        assert_eq!(&args[..4], &["-i", "/media/Show S01E01.mkv", "-i", "/media/Show S01E01.srt"]);
        assert_eq!(&args[4..6], &["-map", "0:v:0"]);
        assert_eq!(args.last().map(String::as_str), Some("/media/out.mkv"));

        let language_pos = args.iter().position(|a| a == "language=jpn").unwrap();
        assert_eq!(args[language_pos - 1], "-metadata:s:a:0");

        let delta = args.iter().position(|a| a == "-max_interleave_delta").unwrap();
        assert_eq!(args[delta + 1], "0");
    }

    #[test]
    fn test_plan_without_external_has_single_input() {
        let mut selection = selection();
        selection.ordered_subtitles.remove(0);
        let plan = RemuxPlan::assemble(&catalog(), &selection, "/media/out.mkv");

        assert_eq!(plan.inputs.len(), 1);
        assert_eq!(plan.tracks.last().map(|t| t.to_string()), Some("0:s:3".to_string()));
    }
}
