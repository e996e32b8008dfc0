//! Console logging for the remuxer
//!
//! - `CleanFormatter` renders tracing events as a compact tree
//! - helper functions cover the messages every run emits

mod formatter;
mod helpers;
mod text_utils;

pub use helpers::{
    log_batch_summary, log_profile_selection, log_remux_complete, log_remux_start,
    log_selection_summary,
};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formatter::CleanFormatter;

/// Installs the global subscriber. `RUST_LOG` overrides `level` when set.
///
/// # Examples
/// ```no_run
/// use track_remuxer::utils::logging::setup_logging;
///
/// setup_logging("info", false, true).expect("Failed to setup logging");
/// ```
pub fn setup_logging(
    level: &str,
    show_timestamps: bool,
    colored: bool,
) -> crate::utils::Result<()> {
    let level = parse_level(level);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(false)
        .with_writer(std::io::stderr)
        .event_format(CleanFormatter::new(show_timestamps, colored));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::utils::Error::config(format!("Failed to set up logging: {}", e)))
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
