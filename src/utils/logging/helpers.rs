//! Logging helpers for the recurring remux messages

use crate::stream::{CodecMode, SelectionResult, SubtitleSource};
use std::path::{Path, PathBuf};

pub fn log_profile_selection(profile: &str, title: Option<&str>) {
    match title {
        Some(title) => tracing::info!("Using selection profile '{}' ({})", profile, title),
        None => tracing::info!("Using selection profile '{}'", profile),
    }
}

/// Summary line at info, one line per chosen track at debug.
pub fn log_selection_summary(selection: &SelectionResult) {
    tracing::info!(
        "Stream selection complete: {} audio, {} subtitle",
        selection.ordered_audio.len(),
        selection.ordered_subtitles.len()
    );

    for (position, audio) in selection.ordered_audio.iter().enumerate() {
        let mode = match &audio.mode {
            CodecMode::Copy => "copy".to_string(),
            CodecMode::Convert { codec, bitrate } => {
                format!("{} -> {} @ {}", audio.codec_name, codec, bitrate)
            }
        };
        tracing::debug!(
            "  audio {}: {} from #{} ({})",
            position,
            audio.title,
            audio.source_index,
            mode
        );
    }

    for (position, subtitle) in selection.ordered_subtitles.iter().enumerate() {
        let source = match &subtitle.source {
            SubtitleSource::Native { index } => format!("#{}", index),
            SubtitleSource::External { path } => path.display().to_string(),
        };
        tracing::debug!("  subtitle {}: {} from {}", position, subtitle.title, source);
    }
}

pub fn log_remux_start(input: &Path, output: &Path) {
    tracing::info!(
        "Starting remux: {} -> {}",
        input.display(),
        output.display()
    );
}

pub fn log_remux_complete(duration: std::time::Duration, output_size: u64) {
    tracing::info!(
        "Remux completed in {:.2}s, output size: {:.2} MB",
        duration.as_secs_f64(),
        output_size as f64 / 1_048_576.0
    );
}

pub fn log_batch_summary(succeeded: usize, failed: &[(PathBuf, String)]) {
    tracing::info!(
        "Batch complete: {} successful, {} failed",
        succeeded,
        failed.len()
    );
    for (path, error) in failed {
        tracing::warn!("  {}: {}", path.display(), error);
    }
}
