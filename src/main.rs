use clap::Parser;
use tracing::info;

use track_remuxer::{
    cli::{handle_commands, CliArgs},
    config::Config,
    processing::RemuxProcessor,
    utils::{
        find_media_files,
        logging::{log_batch_summary, log_profile_selection},
        setup_logging, Error, FfmpegWrapper, Result,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if !args.is_info_command() && args.input.is_empty() {
        use clap::CommandFactory;
        let mut cmd = CliArgs::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    }

    args.validate()?;

    let config = Config::load_with_fallback(&args.config)?;

    setup_logging(
        args.get_log_level(&config.logging.level),
        config.logging.show_timestamps,
        config.logging.colored_output && args.should_use_color(),
    )?;

    if handle_commands(&args, &config).await? {
        return Ok(());
    }

    if args.should_process() {
        handle_remux(&args, &config).await
    } else {
        Ok(())
    }
}

async fn handle_remux(args: &CliArgs, config: &Config) -> Result<()> {
    let ffmpeg = FfmpegWrapper::new(config.tools.ffmpeg.clone(), config.tools.ffprobe.clone());

    ffmpeg
        .check_availability()
        .await
        .map_err(|e| Error::ffmpeg(format!("FFmpeg tools not available: {}", e)))?;

    let mut profile = config.resolve_profile(args.profile.as_deref())?;
    if let Some(enabled) = args.external_subtitle_override() {
        profile.external_subtitle.enabled = enabled;
        profile.validate()?;
    }
    log_profile_selection(&profile.name, Some(profile.title.as_str()));

    let mut media_files = Vec::new();
    for input_path in &args.input {
        let mut files =
            find_media_files(input_path, &config.input.extensions, config.input.recursive)?;
        media_files.append(&mut files);
    }
    info!("Found {} file(s) to process", media_files.len());

    let processor = RemuxProcessor::new(&ffmpeg, config, &profile, args.run_options());
    let report = processor.process_batch(&media_files).await?;

    if report.total() > 1 || !report.failed.is_empty() {
        log_batch_summary(report.succeeded.len(), &report.failed);
    }

    if report.all_failed() {
        return Err(Error::remux("All files failed to process"));
    }

    Ok(())
}
