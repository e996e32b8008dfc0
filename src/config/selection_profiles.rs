use super::priority::PriorityConfig;
use super::types::RawSelectionProfile;
use crate::utils::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct SelectionProfileManager {
    profiles: BTreeMap<String, PriorityConfig>,
}

impl SelectionProfileManager {
    pub fn new(raw_profiles: BTreeMap<String, RawSelectionProfile>) -> Result<Self> {
        let mut profiles = BTreeMap::new();

        for (name, raw_profile) in raw_profiles {
            let profile = PriorityConfig::from_raw(name.clone(), raw_profile)?;
            profiles.insert(name, profile);
        }

        // Built-in profiles when none are configured
        if profiles.is_empty() {
            profiles = Self::create_default_profiles()?;
        }

        info!("Loaded {} selection profiles", profiles.len());
        for (name, profile) in &profiles {
            debug!("Selection profile '{}': {}", name, profile.title);
        }

        Ok(Self { profiles })
    }

    pub fn get_profile(&self, name: &str) -> Result<&PriorityConfig> {
        self.profiles.get(name).ok_or_else(|| {
            Error::config(format!(
                "Selection profile '{}' not found. Available profiles: {}",
                name,
                self.list_profile_names().join(", ")
            ))
        })
    }

    pub fn list_profiles(&self) -> &BTreeMap<String, PriorityConfig> {
        &self.profiles
    }

    pub fn list_profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    fn create_default_profiles() -> Result<BTreeMap<String, PriorityConfig>> {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut profiles = BTreeMap::new();

        // Anime-first ordering: original Japanese audio, German then English
        profiles.insert(
            "default".to_string(),
            PriorityConfig::from_raw(
                "default".to_string(),
                RawSelectionProfile {
                    title: Some("Default - Japanese/German/English audio, German/English subtitles".to_string()),
                    audio_language_priority: strings(&["jpn", "ger", "eng"]),
                    audio_codec_priority: strings(&["eac3", "ac3", "aac", "opus", "pcm_s16be", "dts"]),
                    subtitle_language_priority: strings(&["ger", "eng"]),
                    subtitle_codec_priority: strings(&["ass", "subrip", "hdmv_pgs_subtitle"]),
                    ..RawSelectionProfile::default()
                },
            )?,
        );

        profiles.insert(
            "english_only".to_string(),
            PriorityConfig::from_raw(
                "english_only".to_string(),
                RawSelectionProfile {
                    title: Some("English Only - Audio and subtitles".to_string()),
                    audio_language_priority: strings(&["eng"]),
                    audio_codec_priority: strings(&["eac3", "ac3", "aac", "opus", "pcm_s16be", "dts"]),
                    subtitle_language_priority: strings(&["eng"]),
                    subtitle_codec_priority: strings(&["subrip", "ass", "hdmv_pgs_subtitle"]),
                    fallback_language: "eng".to_string(),
                    ..RawSelectionProfile::default()
                },
            )?,
        );

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::priority::tests::raw_profile;

    #[test]
    fn test_selection_profile_manager_creation() {
        let manager = SelectionProfileManager::new(BTreeMap::new()).unwrap();

        // Should create default profiles
        assert!(!manager.profiles.is_empty());
        assert!(manager.has_profile("default"));
        assert!(manager.has_profile("english_only"));
    }

    #[test]
    fn test_default_profile_structure() {
        let manager = SelectionProfileManager::new(BTreeMap::new()).unwrap();
        let profile = manager.get_profile("default").unwrap();

        assert_eq!(profile.audio_language_priority, vec!["jpn", "ger", "eng"]);
        assert_eq!(profile.subtitle_codec_priority, vec!["ass", "subrip", "hdmv_pgs_subtitle"]);
        assert!(profile.conversion_rules.is_empty());
        assert_eq!(profile.external_language(), None);
        assert_eq!(profile.fallback_language, "und");
    }

    #[test]
    fn test_configured_profiles_replace_builtins() {
        let mut raw = BTreeMap::new();
        raw.insert("anime".to_string(), raw_profile(&["jpn"], &["flac"], &["eng"], &["ass"]));
        let manager = SelectionProfileManager::new(raw).unwrap();

        assert_eq!(manager.list_profile_names(), vec!["anime"]);
        assert!(!manager.has_profile("default"));
    }

    #[test]
    fn test_invalid_profile() {
        let manager = SelectionProfileManager::new(BTreeMap::new()).unwrap();
        let result = manager.get_profile("nonexistent");

        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_raw_profile_fails_construction() {
        let mut raw = BTreeMap::new();
        raw.insert("broken".to_string(), raw_profile(&[], &["aac"], &["eng"], &["ass"]));
        assert!(SelectionProfileManager::new(raw).is_err());
    }
}
