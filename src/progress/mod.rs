//! Remux progress bar fed by ffmpeg's `-progress` key=value stream.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Bar resolution, 0.01% per step
const BAR_LENGTH: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressField {
    OutTime(f64),
    Speed(f32),
    TotalSize(u64),
    /// `progress=continue` or `progress=end`, closing one report block
    BlockEnd { finished: bool },
}

/// Parses one line of ffmpeg `-progress` output. Unknown keys and `N/A`
/// values yield `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressField> {
    let (key, value) = line.trim().split_once('=')?;
    let value = value.trim();

    match key.trim() {
        // out_time_ms is microseconds as well, ffmpeg kept the old name
        "out_time_us" | "out_time_ms" => value
            .parse::<u64>()
            .ok()
            .map(|us| ProgressField::OutTime(us as f64 / 1_000_000.0)),
        "speed" => value
            .trim_end_matches('x')
            .trim()
            .parse()
            .ok()
            .map(ProgressField::Speed),
        "total_size" => value.parse().ok().map(ProgressField::TotalSize),
        "progress" => Some(ProgressField::BlockEnd {
            finished: value == "end",
        }),
        _ => None,
    }
}

pub struct RemuxProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
    total_duration: Option<f64>,
    out_time: f64,
    speed: Option<f32>,
    total_size: Option<u64>,
}

impl RemuxProgress {
    pub fn new(total_duration: Option<f64>, label: &str, update_interval_ms: u64) -> Self {
        let total_duration = total_duration.filter(|d| *d > 0.0);
        let progress_bar = match total_duration {
            Some(_) => {
                let bar = ProgressBar::new(BAR_LENGTH);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} {prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent:>3}% | {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏ "),
                );
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template("{spinner:.green} {prefix} [{elapsed_precise}] {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner
            }
        };
        progress_bar.set_prefix(label.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(update_interval_ms.max(1)));

        Self::with_bar(progress_bar, total_duration)
    }

    /// Progress sink that draws nothing.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden(), None)
    }

    fn with_bar(progress_bar: ProgressBar, total_duration: Option<f64>) -> Self {
        Self {
            progress_bar,
            start_time: Instant::now(),
            total_duration,
            out_time: 0.0,
            speed: None,
            total_size: None,
        }
    }

    pub fn apply_line(&mut self, line: &str) {
        match parse_progress_line(line) {
            Some(ProgressField::OutTime(seconds)) => self.out_time = seconds,
            Some(ProgressField::Speed(speed)) => self.speed = Some(speed),
            Some(ProgressField::TotalSize(bytes)) => self.total_size = Some(bytes),
            Some(ProgressField::BlockEnd { finished }) => {
                if finished {
                    if let Some(total) = self.total_duration {
                        self.out_time = total;
                    }
                }
                self.refresh();
            }
            None => {}
        }
    }

    /// Completed fraction in `0.0..=1.0`, when the source duration is known.
    pub fn fraction(&self) -> Option<f64> {
        self.total_duration
            .map(|total| (self.out_time / total).clamp(0.0, 1.0))
    }

    fn refresh(&self) {
        if let Some(fraction) = self.fraction() {
            self.progress_bar
                .set_position((fraction * BAR_LENGTH as f64) as u64);
        }

        let mut message_parts = Vec::new();
        if let Some(speed) = self.speed {
            message_parts.push(format!("{:.1}x", speed));
        }
        if let Some(size) = self.total_size {
            message_parts.push(format_size(size));
        }
        if !message_parts.is_empty() {
            self.progress_bar.set_message(message_parts.join(" • "));
        }
    }

    pub fn finish(&self) {
        self.progress_bar.set_position(BAR_LENGTH);
        self.progress_bar.finish_with_message(format!(
            "Completed in {}",
            format_duration(self.start_time.elapsed())
        ));
    }

    pub fn abandon(&self) {
        self.progress_bar.abandon_with_message("Failed");
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
