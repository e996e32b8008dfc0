use super::types::RawSelectionProfile;
use crate::stream::normalize_language;
use crate::utils::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

static BITRATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?[kKmM]?$").expect("valid bitrate regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRule {
    pub format: String,
    pub bitrate: String,
    pub keep_original: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSubtitleConfig {
    pub enabled: bool,
    pub language: String,
    pub extension: String,
}

/// Operator priority rules for one run. Language entries are normalized with
/// the same alias table as probed tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityConfig {
    pub name: String,
    pub title: String,
    pub audio_language_priority: Vec<String>,
    pub audio_codec_priority: Vec<String>,
    pub subtitle_language_priority: Vec<String>,
    pub subtitle_codec_priority: Vec<String>,
    /// Keyed by source codec name
    pub conversion_rules: BTreeMap<String, ConversionRule>,
    pub external_subtitle: ExternalSubtitleConfig,
    pub fallback_language: String,
    pub keep_lone_audio_track: bool,
}

impl PriorityConfig {
    pub fn from_raw(name: String, raw: RawSelectionProfile) -> Result<Self> {
        let languages = |list: Vec<String>| -> Vec<String> {
            list.iter().map(|l| normalize_language(l)).collect()
        };
        let codecs = |list: Vec<String>| -> Vec<String> {
            list.iter().map(|c| c.trim().to_lowercase()).collect()
        };

        let conversion_rules = raw
            .conversion_rules
            .into_iter()
            .map(|(source, rule)| {
                (
                    source.trim().to_lowercase(),
                    ConversionRule {
                        format: rule.format.trim().to_lowercase(),
                        bitrate: rule.bitrate.trim().to_string(),
                        keep_original: rule.keep_original,
                    },
                )
            })
            .collect();

        let config = Self {
            title: raw.title.unwrap_or_else(|| name.clone()),
            name,
            audio_language_priority: languages(raw.audio_language_priority),
            audio_codec_priority: codecs(raw.audio_codec_priority),
            subtitle_language_priority: languages(raw.subtitle_language_priority),
            subtitle_codec_priority: codecs(raw.subtitle_codec_priority),
            conversion_rules,
            external_subtitle: ExternalSubtitleConfig {
                enabled: raw.external_subtitle.enabled,
                language: normalize_language(&raw.external_subtitle.language),
                extension: raw
                    .external_subtitle
                    .extension
                    .trim()
                    .trim_start_matches('.')
                    .to_string(),
            },
            fallback_language: normalize_language(&raw.fallback_language),
            keep_lone_audio_track: raw.keep_lone_audio_track,
        };

        config.validate()?;
        Ok(config)
    }

    /// Injection language when external subtitles are enabled.
    pub fn external_language(&self) -> Option<&str> {
        self.external_subtitle
            .enabled
            .then_some(self.external_subtitle.language.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        validate_list(&self.name, "audio_language_priority", &self.audio_language_priority)?;
        validate_list(&self.name, "audio_codec_priority", &self.audio_codec_priority)?;
        validate_list(
            &self.name,
            "subtitle_language_priority",
            &self.subtitle_language_priority,
        )?;
        validate_list(&self.name, "subtitle_codec_priority", &self.subtitle_codec_priority)?;

        if self.fallback_language.is_empty() {
            return Err(Error::config(format!(
                "Profile '{}': fallback_language must not be empty",
                self.name
            )));
        }

        for (source, rule) in &self.conversion_rules {
            if source.is_empty() || rule.format.is_empty() {
                return Err(Error::config(format!(
                    "Profile '{}': conversion rule '{}' needs both a source codec and a target format",
                    self.name, source
                )));
            }

            if !BITRATE_REGEX.is_match(&rule.bitrate) {
                return Err(Error::config(format!(
                    "Profile '{}': invalid bitrate '{}' for conversion rule '{}'",
                    self.name, rule.bitrate, source
                )));
            }

            if rule.keep_original && rule.format == *source {
                return Err(Error::config(format!(
                    "Profile '{}': conversion rule '{}' converts to itself with keep_original, \
                     which would produce duplicate '{}' tracks",
                    self.name, source, source
                )));
            }
        }

        if self.external_subtitle.enabled
            && (self.external_subtitle.language.is_empty()
                || self.external_subtitle.extension.is_empty())
        {
            return Err(Error::config(format!(
                "Profile '{}': external_subtitle needs a language and a file extension",
                self.name
            )));
        }

        Ok(())
    }
}

fn validate_list(profile: &str, field: &str, entries: &[String]) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::config(format!(
            "Profile '{}': {} must contain at least one entry",
            profile, field
        )));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if entry.is_empty() {
            return Err(Error::config(format!(
                "Profile '{}': {} contains a blank entry",
                profile, field
            )));
        }
        if !seen.insert(entry.as_str()) {
            return Err(Error::config(format!(
                "Profile '{}': {} lists '{}' more than once",
                profile, field, entry
            )));
        }
    }

    Ok(())
}
