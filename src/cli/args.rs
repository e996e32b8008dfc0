use crate::processing::RunOptions;
use crate::utils::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(name = "track-remux")]
#[command(about = "Reorders, filters and relabels the audio and subtitle tracks of media containers")]
#[command(long_about = "
Probes each container with ffprobe, picks audio and subtitle tracks by language and codec
priority, and writes a stream-copied remux with clean titles, language tags and default
flags. Audio codecs with a conversion rule are transcoded instead of copied.

EXAMPLES:
  # Remux one file with the default selection profile
  track-remux -i episode.mkv

  # Whole season, inject episode.srt next to each file, move sources away afterwards
  track-remux -i ~/Anime/Season1/ --external-subtitle --move-completed

  # Show what would run without writing anything
  track-remux -i movie.mkv -s english_only --dry-run
")]
pub struct CliArgs {
    /// Input media file or directory (can be specified multiple times)
    #[arg(short, long, value_name = "PATH", action = clap::ArgAction::Append)]
    pub input: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", value_name = "FILE")]
    pub config: PathBuf,

    /// Selection profile to use (see --list-profiles)
    #[arg(short = 's', long = "profile", value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Plan every file and print the ffmpeg command without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Move the source and its companions into the moved directory after a successful remux
    #[arg(long)]
    pub move_completed: bool,

    /// Inject the companion subtitle file (<stem>.srt) regardless of the profile
    #[arg(long, conflicts_with = "no_external_subtitle")]
    pub external_subtitle: bool,

    /// Never inject a companion subtitle file
    #[arg(long)]
    pub no_external_subtitle: bool,

    /// Print the probed streams of each input and output
    #[arg(long)]
    pub show_streams: bool,

    /// List available selection profiles
    #[arg(long)]
    pub list_profiles: bool,

    /// Show detailed information about a specific selection profile
    #[arg(long, value_name = "PROFILE")]
    pub show_profile: Option<String>,

    /// Validate configuration file
    #[arg(long)]
    pub validate_config: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    pub fn get_log_level<'a>(&self, config_level: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else {
            config_level
        }
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_info_command(&self) -> bool {
        self.list_profiles || self.show_profile.is_some() || self.validate_config
    }

    pub fn should_process(&self) -> bool {
        !self.is_info_command() && !self.input.is_empty()
    }

    /// `Some(true)` / `Some(false)` when the command line overrides the
    /// profile's external subtitle switch.
    pub fn external_subtitle_override(&self) -> Option<bool> {
        match (self.external_subtitle, self.no_external_subtitle) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            move_completed: self.move_completed,
            show_streams: self.show_streams,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.should_process() {
            for input in &self.input {
                if !input.exists() {
                    return Err(Error::validation(format!(
                        "Input path does not exist: {}",
                        input.display()
                    )));
                }
            }
        }

        if self.dry_run && self.move_completed {
            return Err(Error::validation(
                "--dry-run and --move-completed cannot be combined",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("track-remux").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_inputs_and_profile() {
        let args = parse(&["-i", "a.mkv", "-i", "dir/", "-s", "english_only", "--dry-run"]);
        assert_eq!(args.input, vec![PathBuf::from("a.mkv"), PathBuf::from("dir/")]);
        assert_eq!(args.profile.as_deref(), Some("english_only"));
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert!(args.should_process());
        assert_eq!(
            args.run_options(),
            RunOptions {
                dry_run: true,
                move_completed: false,
                show_streams: false
            }
        );
    }

    #[test]
    fn test_external_subtitle_override() {
        assert_eq!(parse(&[]).external_subtitle_override(), None);
        assert_eq!(
            parse(&["--external-subtitle"]).external_subtitle_override(),
            Some(true)
        );
        assert_eq!(
            parse(&["--no-external-subtitle"]).external_subtitle_override(),
            Some(false)
        );
        assert!(CliArgs::try_parse_from([
            "track-remux",
            "--external-subtitle",
            "--no-external-subtitle"
        ])
        .is_err());
    }

    #[test]
    fn test_info_commands_skip_processing() {
        let args = parse(&["-i", "a.mkv", "--list-profiles"]);
        assert!(args.is_info_command());
        assert!(!args.should_process());
    }

    #[test]
    fn test_log_level_and_color() {
        let args = parse(&["--debug", "--no-color"]);
        assert_eq!(args.get_log_level("warn"), "debug");
        assert!(!args.should_use_color());
        assert_eq!(parse(&[]).get_log_level("warn"), "warn");
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let args = parse(&["-i", "/nonexistent/show.mkv"]);
        assert!(matches!(args.validate(), Err(Error::Validation { .. })));

        let args = parse(&["--dry-run", "--move-completed"]);
        assert!(args.validate().is_err());
    }
}
