use super::{
    track_title, ExternalSubtitle, SelectedSubtitle, StreamRecord, SubtitleSource, SUBRIP_CODEC,
};
use crate::config::PriorityConfig;
use std::cmp::Reverse;
use tracing::{debug, warn};

impl SelectedSubtitle {
    fn native(record: &StreamRecord) -> Self {
        Self {
            source: SubtitleSource::Native {
                index: record.index,
            },
            codec_name: record.codec_name.clone(),
            language: record.language.clone(),
            title: track_title(&record.language, &record.codec_name),
        }
    }

    fn external(external: &ExternalSubtitle) -> Self {
        Self {
            source: SubtitleSource::External {
                path: external.path.clone(),
            },
            codec_name: external.codec_name.clone(),
            language: external.language.clone(),
            title: track_title(&external.language, SUBRIP_CODEC),
        }
    }
}

/// Orders subtitle tracks by language priority, then codec priority.
///
/// Forced tracks never qualify. The external subtitle, when present, takes
/// the `subrip` slot of the first language it matches and is injected once.
pub fn select_subtitles(
    records: &[StreamRecord],
    external: Option<&ExternalSubtitle>,
    config: &PriorityConfig,
) -> Vec<SelectedSubtitle> {
    let mut selected = Vec::new();
    let mut pending_external = external;

    for language in &config.subtitle_language_priority {
        let candidates: Vec<&StreamRecord> = records
            .iter()
            .filter(|r| !r.forced && r.language.contains(language.as_str()))
            .collect();

        let mut inject_here =
            pending_external.filter(|ext| ext.language.contains(language.as_str()));

        if candidates.is_empty() && inject_here.is_none() {
            debug!("No subtitle tracks for language '{}'", language);
            continue;
        }

        for codec in &config.subtitle_codec_priority {
            if codec == SUBRIP_CODEC {
                if let Some(ext) = inject_here.take() {
                    debug!("Injecting external subtitle {}", ext.path.display());
                    selected.push(SelectedSubtitle::external(ext));
                    pending_external = None;
                    continue;
                }
            }

            let same_codec: Vec<&StreamRecord> = candidates
                .iter()
                .copied()
                .filter(|r| r.codec_name == *codec)
                .collect();

            let chosen = match same_codec.as_slice() {
                [] => continue,
                [only] => *only,
                duplicates => resolve_duplicate(duplicates, language, codec),
            };
            selected.push(SelectedSubtitle::native(chosen));
        }
    }

    debug!(
        "Subtitle order: {:?}",
        selected.iter().map(|s| s.title.as_str()).collect::<Vec<_>>()
    );
    selected
}

/// Picks one of several same-language, same-codec tracks: the highest frame
/// count wins when any candidate carries one, otherwise the first track whose
/// title does not mention "forced".
fn resolve_duplicate<'a>(
    duplicates: &[&'a StreamRecord],
    language: &str,
    codec: &str,
) -> &'a StreamRecord {
    let first = duplicates[0];

    if duplicates.iter().any(|r| r.frame_count_hint.is_some()) {
        return duplicates
            .iter()
            .copied()
            .min_by_key(|r| (Reverse(r.frame_count_hint), r.index))
            .unwrap_or(first);
    }

    let chosen = duplicates
        .iter()
        .copied()
        .find(|r| !r.title_mentions_forced())
        .unwrap_or(first);

    warn!(
        "Found {} identical {} subtitles for '{}' without frame counts, using the {} (#{})",
        duplicates.len(),
        codec,
        language,
        duplicate_choice(chosen, first),
        chosen.index
    );
    chosen
}

fn duplicate_choice(chosen: &StreamRecord, first: &StreamRecord) -> &'static str {
    if chosen.index != first.index {
        "first non-forced-titled one"
    } else if chosen.title_mentions_forced() {
        "first one, every title mentions forced"
    } else {
        "first one"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::priority::tests::raw_profile;
    use crate::config::types::RawExternalSubtitle;
    use crate::stream::CodecType;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn sub(index: usize, language: &str, codec: &str) -> StreamRecord {
        StreamRecord {
            index,
            codec_type: CodecType::Subtitle,
            codec_name: codec.to_string(),
            language: language.to_string(),
            forced: false,
            title: None,
            frame_count_hint: None,
        }
    }

    fn config(languages: &[&str], codecs: &[&str]) -> PriorityConfig {
        PriorityConfig::from_raw(
            "test".to_string(),
            raw_profile(&["jpn"], &["aac"], languages, codecs),
        )
        .unwrap()
    }

    fn external_config(languages: &[&str], codecs: &[&str], language: &str) -> PriorityConfig {
        let mut raw = raw_profile(&["jpn"], &["aac"], languages, codecs);
        raw.external_subtitle = RawExternalSubtitle {
            enabled: true,
            language: language.to_string(),
            extension: "srt".to_string(),
        };
        PriorityConfig::from_raw("test".to_string(), raw).unwrap()
    }

    fn srt(language: &str, codec: &str) -> ExternalSubtitle {
        ExternalSubtitle {
            path: PathBuf::from("/media/show.srt"),
            codec_name: codec.to_string(),
            language: language.to_string(),
            title: format!("{} subrip", language.to_uppercase()),
        }
    }

    fn titles(selection: &[SelectedSubtitle]) -> Vec<&str> {
        selection.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_language_then_codec_order_with_pgs_label() {
        let records = vec![
            sub(0, "eng", "hdmv_pgs_subtitle"),
            sub(1, "ger", "subrip"),
            sub(2, "eng", "ass"),
            sub(3, "ger", "ass"),
        ];
        let selection = select_subtitles(
            &records,
            None,
            &config(&["ger", "eng"], &["ass", "subrip", "hdmv_pgs_subtitle"]),
        );

        assert_eq!(
            titles(&selection),
            vec!["GER ass", "GER subrip", "ENG ass", "ENG pgs"]
        );
        assert_eq!(selection[3].codec_name, "hdmv_pgs_subtitle");
    }

    #[test]
    fn test_forced_tracks_are_never_selected() {
        let mut forced = sub(0, "eng", "subrip");
        forced.forced = true;
        let records = vec![forced, sub(1, "eng", "ass")];
        let selection = select_subtitles(&records, None, &config(&["eng"], &["subrip", "ass"]));

        assert_eq!(titles(&selection), vec!["ENG ass"]);
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 1 });
    }

    #[test]
    fn test_duplicate_prefers_highest_frame_count() {
        let mut a = sub(0, "eng", "subrip");
        a.frame_count_hint = Some(500);
        let mut b = sub(1, "eng", "subrip");
        b.frame_count_hint = Some(900);
        let c = sub(2, "eng", "subrip");

        let selection = select_subtitles(&[a, b, c], None, &config(&["eng"], &["subrip"]));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 1 });
    }

    #[test]
    fn test_duplicate_frame_count_tie_keeps_first() {
        let mut a = sub(0, "eng", "ass");
        a.frame_count_hint = Some(700);
        let mut b = sub(1, "eng", "ass");
        b.frame_count_hint = Some(700);

        let selection = select_subtitles(&[a, b], None, &config(&["eng"], &["ass"]));
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 0 });
    }

    #[test]
    fn test_duplicate_without_hints_skips_forced_title() {
        let mut signs = sub(0, "eng", "ass");
        signs.title = Some("Signs (FORCED)".to_string());
        let mut full = sub(1, "eng", "ass");
        full.title = Some("Full".to_string());

        let selection = select_subtitles(&[signs, full], None, &config(&["eng"], &["ass"]));
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 1 });
    }

    #[test]
    fn test_duplicate_all_titles_forced_falls_back_to_first() {
        let mut a = sub(0, "eng", "ass");
        a.title = Some("forced".to_string());
        let mut b = sub(1, "eng", "ass");
        b.title = Some("forced too".to_string());

        let selection = select_subtitles(&[a, b], None, &config(&["eng"], &["ass"]));
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 0 });
    }

    #[test]
    fn test_duplicate_warning_names_the_choice() {
        let mut signs = sub(0, "eng", "ass");
        signs.title = Some("Signs (Forced)".to_string());
        let mut full = sub(1, "eng", "ass");
        full.title = Some("Full".to_string());
        let plain = sub(2, "eng", "ass");

        assert_eq!(duplicate_choice(&full, &signs), "first non-forced-titled one");
        assert_eq!(
            duplicate_choice(&signs, &signs),
            "first one, every title mentions forced"
        );
        assert_eq!(duplicate_choice(&plain, &plain), "first one");
    }

    #[test]
    fn test_external_injected_without_native_candidates() {
        let external = srt("ger", "subrip");
        let selection = select_subtitles(
            &[sub(0, "eng", "ass")],
            Some(&external),
            &external_config(&["ger", "eng"], &["subrip", "ass"], "ger"),
        );

        assert_eq!(titles(&selection), vec!["GER subrip", "ENG ass"]);
        assert_eq!(
            selection[0].source,
            SubtitleSource::External {
                path: PathBuf::from("/media/show.srt")
            }
        );
    }

    #[test]
    fn test_external_takes_subrip_slot_even_if_not_subrip() {
        let external = srt("ger", "ass");
        let records = vec![sub(0, "ger", "subrip"), sub(1, "ger", "ass")];
        let selection = select_subtitles(
            &records,
            Some(&external),
            &external_config(&["ger"], &["ass", "subrip"], "ger"),
        );

        assert_eq!(titles(&selection), vec!["GER ass", "GER subrip"]);
        assert_eq!(selection[0].source, SubtitleSource::Native { index: 1 });
        assert!(matches!(selection[1].source, SubtitleSource::External { .. }));
    }

    #[test]
    fn test_external_injected_once() {
        let external = srt("ger", "subrip");
        let records = vec![sub(0, "ger-sdh", "subrip")];
        let selection = select_subtitles(
            &records,
            Some(&external),
            &external_config(&["ger", "ger-sdh"], &["subrip"], "ger"),
        );

        let injected = selection
            .iter()
            .filter(|s| matches!(s.source, SubtitleSource::External { .. }))
            .count();
        assert_eq!(injected, 1);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_external_not_injected_for_other_language() {
        let external = srt("ger", "subrip");
        let records = vec![sub(0, "eng", "subrip")];
        let selection = select_subtitles(
            &records,
            Some(&external),
            &external_config(&["eng"], &["subrip"], "ger"),
        );

        assert_eq!(titles(&selection), vec!["ENG subrip"]);
    }
}
