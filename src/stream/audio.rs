use super::{display_codec_name, track_title, CodecMode, SelectedAudio, StreamRecord};
use crate::config::{ConversionRule, PriorityConfig};
use tracing::debug;

impl SelectedAudio {
    fn copy(record: &StreamRecord) -> Self {
        Self {
            source_index: record.index,
            codec_name: record.codec_name.clone(),
            language: record.language.clone(),
            title: track_title(&record.language, &record.codec_name),
            mode: CodecMode::Copy,
        }
    }

    fn converted(record: &StreamRecord, rule: &ConversionRule) -> Self {
        Self {
            source_index: record.index,
            codec_name: rule.format.clone(),
            language: record.language.clone(),
            title: track_title(&record.language, &rule.format),
            mode: CodecMode::Convert {
                codec: rule.format.clone(),
                bitrate: rule.bitrate.clone(),
            },
        }
    }
}

/// Orders audio tracks by language priority, then codec priority.
///
/// Without conversion rules every record of a language whose codec appears in
/// the codec list is kept. With conversion rules only the first record of each
/// language is considered; it is converted when its codec has a rule whose
/// target sits at the current codec-priority slot, and optionally kept in its
/// original form right after the converted copy.
///
/// With `keep_lone_audio_track`, a file whose only audio track matched
/// nothing still keeps that track, converted when a rule covers its codec.
pub fn select_audio(records: &[StreamRecord], config: &PriorityConfig) -> Vec<SelectedAudio> {
    let mut selected = Vec::new();

    for language in &config.audio_language_priority {
        let matching: Vec<&StreamRecord> = records
            .iter()
            .filter(|r| r.language.contains(language.as_str()))
            .collect();

        let Some(first) = matching.first() else {
            debug!("No audio tracks for language '{}'", language);
            continue;
        };

        if config.conversion_rules.is_empty() {
            for codec in &config.audio_codec_priority {
                selected.extend(
                    matching
                        .iter()
                        .filter(|r| r.codec_name == *codec)
                        .map(|r| SelectedAudio::copy(r)),
                );
            }
        } else {
            select_with_conversion(first, config, &mut selected);
        }
    }

    if selected.is_empty() && config.keep_lone_audio_track {
        if let [only] = records {
            debug!("Single audio track matched no priority, keeping it");
            selected = lone_track(only, config);
        }
    }

    debug!(
        "Audio order: {:?}",
        selected.iter().map(|s| s.title.as_str()).collect::<Vec<_>>()
    );
    selected
}

fn lone_track(record: &StreamRecord, config: &PriorityConfig) -> Vec<SelectedAudio> {
    let mut selected = Vec::new();
    select_with_conversion(record, config, &mut selected);
    if selected.is_empty() {
        selected.push(SelectedAudio::copy(record));
    }
    selected
}

fn select_with_conversion(
    record: &StreamRecord,
    config: &PriorityConfig,
    selected: &mut Vec<SelectedAudio>,
) {
    let rule = config.conversion_rules.get(&record.codec_name);

    for codec in &config.audio_codec_priority {
        let slot = display_codec_name(codec);

        match rule {
            Some(rule) if display_codec_name(&rule.format) == slot => {
                selected.push(SelectedAudio::converted(record, rule));
                if rule.keep_original {
                    selected.push(SelectedAudio::copy(record));
                }
            }
            None if display_codec_name(&record.codec_name) == slot => {
                selected.push(SelectedAudio::copy(record));
            }
            _ => {}
        }
    }
}
