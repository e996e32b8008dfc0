mod stream_info;

pub use stream_info::{format_stream_table, print_stream_info};

use crate::{
    config::{Config, PriorityConfig},
    progress::RemuxProgress,
    stream::{select_tracks, CodecType, ExternalSubtitle, RemuxPlan, StreamCatalog},
    utils::{
        companion_subtitle_path, create_output_path,
        logging::{log_remux_complete, log_remux_start, log_selection_summary},
        move_completed, Error, FfmpegWrapper, Result,
    },
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Switches from the command line that change what a run does to each file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub move_completed: bool,
    pub show_streams: bool,
}

/// Per-file outcomes of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when there was work and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

pub struct RemuxProcessor<'a> {
    ffmpeg: &'a FfmpegWrapper,
    config: &'a Config,
    profile: &'a PriorityConfig,
    options: RunOptions,
}

impl<'a> RemuxProcessor<'a> {
    pub fn new(
        ffmpeg: &'a FfmpegWrapper,
        config: &'a Config,
        profile: &'a PriorityConfig,
        options: RunOptions,
    ) -> Self {
        Self {
            ffmpeg,
            config,
            profile,
            options,
        }
    }

    /// Processes every file in order. File-local failures are recorded and
    /// the batch moves on; anything else aborts the run.
    pub async fn process_batch(&self, files: &[PathBuf]) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for (index, input_path) in files.iter().enumerate() {
            info!(
                "Processing file {}/{}: {}",
                index + 1,
                files.len(),
                input_path.display()
            );

            match self.process_file(input_path).await {
                Ok(output) => {
                    debug!("Finished {}", output.display());
                    report.succeeded.push(input_path.clone());
                }
                Err(e) if e.is_file_local() => {
                    error!("Failed to process {}: {}", input_path.display(), e);
                    report.failed.push((input_path.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Runs the full pipeline for one container and returns where the result
    /// ended up. In dry-run mode nothing is written and the would-be output
    /// path is returned.
    pub async fn process_file(&self, input_path: &Path) -> Result<PathBuf> {
        let (catalog, plan) = self.prepare(input_path).await?;

        if self.options.dry_run {
            info!("Dry run: {}", render_command(self.ffmpeg.ffmpeg_path(), &plan));
            return Ok(plan.output);
        }

        self.complete(input_path, &plan, catalog.duration).await
    }

    /// Remux, then the optional output listing and move. A failed remux
    /// leaves no output behind and moves nothing.
    async fn complete(
        &self,
        input_path: &Path,
        plan: &RemuxPlan,
        duration: Option<f64>,
    ) -> Result<PathBuf> {
        self.remux(plan, duration).await?;

        if self.options.show_streams || self.config.output.show_stream_info {
            self.show_output_streams(&plan.output).await;
        }

        if self.options.move_completed || self.config.output.move_completed_files {
            let final_path =
                move_completed(input_path, &plan.output, &self.config.output.moved_dir_name)?;
            info!("Moved completed files, output now at {}", final_path.display());
            return Ok(final_path);
        }

        Ok(plan.output.clone())
    }

    /// Probe, select and assemble without touching the filesystem.
    pub async fn plan(&self, input_path: &Path) -> Result<RemuxPlan> {
        self.prepare(input_path).await.map(|(_, plan)| plan)
    }

    async fn prepare(&self, input_path: &Path) -> Result<(StreamCatalog, RemuxPlan)> {
        info!("Analyzing stream structure");
        let probe = self.ffmpeg.probe(input_path).await?;
        let catalog =
            StreamCatalog::from_probe(input_path, &probe, &self.profile.fallback_language);

        if self.options.show_streams || self.config.output.show_stream_info {
            print_stream_info(&catalog);
        }

        catalog.require(&[CodecType::Video, CodecType::Audio])?;

        let external = self.find_external_subtitle(input_path).await?;
        let selection = select_tracks(&catalog, external.as_ref(), self.profile);
        log_selection_summary(&selection);

        match (selection.injected_external(), &external) {
            (Some(path), _) => info!("Injecting external subtitle {}", path.display()),
            (None, Some(external)) => warn!(
                "External subtitle {} matched no subtitle slot and is not used",
                external.path.display()
            ),
            (None, None) => {}
        }

        let output = create_output_path(input_path);
        let plan = RemuxPlan::assemble(&catalog, &selection, output);
        Ok((catalog, plan))
    }

    async fn find_external_subtitle(&self, input_path: &Path) -> Result<Option<ExternalSubtitle>> {
        let Some(language) = self.profile.external_language() else {
            return Ok(None);
        };

        let path = companion_subtitle_path(input_path, &self.profile.external_subtitle.extension);
        if !path.is_file() {
            return Err(Error::injection_missing(&path));
        }

        let probe = self.ffmpeg.probe(&path).await?;
        ExternalSubtitle::from_probe(&path, &probe, language).map(Some)
    }

    async fn remux(&self, plan: &RemuxPlan, duration: Option<f64>) -> Result<()> {
        log_remux_start(&plan.source, &plan.output);

        let progress = if self.config.progress.enabled {
            RemuxProgress::new(
                duration,
                &file_label(&plan.source),
                self.config.progress.update_interval_ms,
            )
        } else {
            RemuxProgress::hidden()
        };

        let start = std::time::Instant::now();
        if let Err(e) = self.ffmpeg.run_remux(&plan.to_ffmpeg_args(), progress).await {
            remove_partial_output(&plan.output).await;
            return Err(e);
        }

        let output_size = tokio::fs::metadata(&plan.output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        log_remux_complete(start.elapsed(), output_size);
        Ok(())
    }

    async fn show_output_streams(&self, output: &Path) {
        match self.ffmpeg.probe(output).await {
            Ok(probe) => {
                let catalog =
                    StreamCatalog::from_probe(output, &probe, &self.profile.fallback_language);
                print_stream_info(&catalog);
            }
            Err(e) => warn!("Could not probe output {}: {}", output.display(), e),
        }
    }
}

async fn remove_partial_output(output: &Path) {
    if !output.exists() {
        return;
    }
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!("Removed partial output {}", output.display()),
        Err(e) => warn!("Failed to remove partial output {}: {}", output.display(), e),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The ffmpeg command line as a user could paste it into a shell.
pub fn render_command(ffmpeg_path: &str, plan: &RemuxPlan) -> String {
    std::iter::once(ffmpeg_path.to_string())
        .chain(plan.to_ffmpeg_args())
        .map(|arg| quote_arg(&arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,:/=+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
