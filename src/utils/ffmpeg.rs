use crate::progress::RemuxProgress;
use crate::stream::ProbeOutput;
use crate::utils::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Number of trailing stderr lines kept in a remux error message.
const STDERR_TAIL_LINES: usize = 10;

#[derive(Debug, Clone)]
pub struct FfmpegWrapper {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegWrapper {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    /// Probes every stream of `input_path`. Any failure, including a missing
    /// or non-container file, is reported as a probe error.
    pub async fn probe<P: AsRef<Path>>(&self, input_path: P) -> Result<ProbeOutput> {
        let input_path = input_path.as_ref();

        if !input_path.is_file() {
            return Err(Error::probe(input_path, "file does not exist"));
        }

        let output = self
            .run_ffprobe(&[
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                &input_path.to_string_lossy(),
            ])
            .await
            .map_err(|e| Error::probe(input_path, e.to_string()))?;

        ProbeOutput::parse(input_path, &output)
    }

    /// Runs ffmpeg with the given remux arguments. Progress is read from
    /// `-progress pipe:1`; stderr is kept for the error message.
    pub async fn run_remux(&self, args: &[String], mut progress: RemuxProgress) -> Result<()> {
        let mut cmd_args: Vec<String> = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-nostats".to_string(),
            "-progress".to_string(),
            "pipe:1".to_string(),
        ];
        cmd_args.extend(args.iter().cloned());

        debug!("Running: {} {}", self.ffmpeg_path, cmd_args.join(" "));

        let mut child = piped_command(&self.ffmpeg_path, &cmd_args)
            .spawn()
            .map_err(|e| Error::remux(format!("failed to start {}: {}", self.ffmpeg_path, e)))?;

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buffer = String::new();
                let _ = stderr.read_to_string(&mut buffer).await;
                buffer
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                progress.apply_line(&line);
            }
        }

        let status = child.wait().await?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            progress.abandon();
            return Err(Error::remux(format!(
                "ffmpeg exited with {}: {}",
                status,
                stderr_tail(&stderr)
            )));
        }

        progress.finish();
        Ok(())
    }

    pub async fn check_availability(&self) -> Result<()> {
        let ffmpeg_check = TokioCommand::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .await?;

        if !ffmpeg_check.status.success() {
            return Err(Error::ffmpeg("FFmpeg is not available or not executable"));
        }

        let ffprobe_check = TokioCommand::new(&self.ffprobe_path)
            .arg("-version")
            .output()
            .await?;

        if !ffprobe_check.status.success() {
            return Err(Error::ffmpeg("FFprobe is not available or not executable"));
        }

        Ok(())
    }

    /// Run ffprobe with custom arguments and return stdout as string
    pub async fn run_ffprobe(&self, args: &[&str]) -> Result<String> {
        debug!("Running ffprobe with args: {:?}", args);

        let output = TokioCommand::new(&self.ffprobe_path)
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ffmpeg(format!("ffprobe failed: {}", error_msg.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Piped stdout and stderr. The child is killed when its handle is dropped.
fn piped_command(program: &str, args: &[String]) -> TokioCommand {
    let mut command = TokioCommand::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}
