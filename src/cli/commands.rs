use crate::{
    cli::CliArgs,
    config::{Config, PriorityConfig},
    utils::Result,
};
use std::path::Path;

/// Runs the informational commands. Returns true when one ran and the
/// process should exit without remuxing.
pub async fn handle_commands(args: &CliArgs, config: &Config) -> Result<bool> {
    if args.list_profiles {
        list_profiles(config).await?;
        return Ok(true);
    }

    if let Some(profile_name) = &args.show_profile {
        show_profile(config, profile_name).await?;
        return Ok(true);
    }

    if args.validate_config {
        validate_config(&args.config).await?;
        return Ok(true);
    }

    Ok(false)
}

async fn list_profiles(config: &Config) -> Result<()> {
    let manager = config.profile_manager()?;

    println!("Available selection profiles:");
    println!("{:-<80}", "");
    println!(
        "{:<20} {:<30} {:<14} {:<14}",
        "Name", "Title", "Audio langs", "Subtitle langs"
    );
    println!("{:-<80}", "");

    for (name, profile) in manager.list_profiles() {
        let marker = if *name == config.default_profile { "*" } else { "" };
        println!(
            "{:<20} {:<30} {:<14} {:<14}",
            format!("{}{}", name, marker),
            truncate(&profile.title, 30),
            profile.audio_language_priority.join(","),
            profile.subtitle_language_priority.join(","),
        );
    }

    println!("{:-<80}", "");
    println!("* default profile");
    println!("Use --show-profile <PROFILE> for detailed information");
    println!("Use -s/--profile <PROFILE> to select a profile");

    Ok(())
}

async fn show_profile(config: &Config, name: &str) -> Result<()> {
    let manager = config.profile_manager()?;

    match manager.get_profile(name) {
        Ok(profile) => print!("{}", describe_profile(profile)),
        Err(_) => {
            println!("Selection profile '{}' not found.", name);
            println!();
            println!("Available profiles:");
            for profile_name in manager.list_profile_names() {
                println!("  - {}", profile_name);
            }
        }
    }

    Ok(())
}

fn describe_profile(profile: &PriorityConfig) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line(format!("Selection Profile: {}", profile.name));
    line(format!("{:=<50}", ""));
    line(format!("Title: {}", profile.title));
    line(format!("Fallback language: {}", profile.fallback_language));
    line(String::new());

    line("Audio:".to_string());
    line(format!("{:-<30}", ""));
    line(format!(
        "  Languages: {}",
        profile.audio_language_priority.join(", ")
    ));
    line(format!("  Codecs: {}", profile.audio_codec_priority.join(", ")));
    if profile.conversion_rules.is_empty() {
        line("  Conversions: none".to_string());
    } else {
        line("  Conversions:".to_string());
        for (source, rule) in &profile.conversion_rules {
            line(format!(
                "    {} -> {} @ {}{}",
                source,
                rule.format,
                rule.bitrate,
                if rule.keep_original {
                    " (keep original)"
                } else {
                    ""
                }
            ));
        }
    }
    line(format!(
        "  Keep lone track: {}",
        profile.keep_lone_audio_track
    ));
    line(String::new());

    line("Subtitles:".to_string());
    line(format!("{:-<30}", ""));
    line(format!(
        "  Languages: {}",
        profile.subtitle_language_priority.join(", ")
    ));
    line(format!(
        "  Codecs: {}",
        profile.subtitle_codec_priority.join(", ")
    ));
    match profile.external_language() {
        Some(language) => line(format!(
            "  External: <stem>.{} as {}",
            profile.external_subtitle.extension, language
        )),
        None => line("  External: disabled".to_string()),
    }

    out
}

async fn validate_config(config_path: &Path) -> Result<()> {
    let loaded = if config_path.exists() {
        Config::load(config_path)
    } else {
        Config::load_with_fallback(config_path)
    };

    match loaded.and_then(|config| config.profile_manager().map(|m| (config, m))) {
        Ok((config, manager)) => {
            if config_path.exists() {
                println!("✓ Configuration file is valid: {}", config_path.display());
            } else {
                println!("✓ Configuration is valid (using discovered/default config)");
            }
            println!();

            println!("Configuration Summary:");
            println!("{:-<40}", "");
            println!("Profiles defined: {}", manager.list_profiles().len());
            println!("Default profile: {}", config.default_profile);
            println!("Extensions: {}", config.input.extensions.join(", "));
            println!("Move completed files: {}", config.output.move_completed_files);
            println!("✓ All profiles loaded successfully");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration validation failed: {}", e);
            println!();
            println!("Common issues:");
            println!("  - Check YAML syntax and indentation");
            println!("  - Priority lists must not be empty or contain duplicates");
            println!("  - Bitrates look like 640k or 1.5M");
            Err(e)
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_list_profiles() {
        let config = Config::default();
        assert!(list_profiles(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_show_profile() {
        let config = Config::default();
        assert!(show_profile(&config, "default").await.is_ok());
        // Unknown names print the available list instead of failing
        assert!(show_profile(&config, "nonexistent").await.is_ok());
    }

    #[test]
    fn test_describe_profile() {
        let config = Config::default();
        let profile = config.resolve_profile(Some("default")).unwrap();
        let text = describe_profile(&profile);

        assert!(text.starts_with("Selection Profile: default\n"));
        assert!(text.contains("  Languages: jpn, ger, eng\n"));
        assert!(text.contains("  External: disabled\n"));
    }

    #[tokio::test]
    async fn test_validate_config() {
        let mut valid = NamedTempFile::new().unwrap();
        writeln!(valid, "tools:\n  ffmpeg: \"ffmpeg\"\n  ffprobe: \"ffprobe\"").unwrap();
        valid.flush().unwrap();
        assert!(validate_config(valid.path()).await.is_ok());

        let mut invalid = NamedTempFile::new().unwrap();
        writeln!(invalid, "progress:\n  enabled: true\n  update_interval_ms: 0").unwrap();
        invalid.flush().unwrap();
        assert!(validate_config(invalid.path()).await.is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
