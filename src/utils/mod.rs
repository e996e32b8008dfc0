pub mod error;
pub mod ffmpeg;
pub mod filesystem;
pub mod logging;

pub use error::{Error, Result};
pub use ffmpeg::FfmpegWrapper;
pub use filesystem::{
    companion_subtitle_path, create_output_path, find_media_files, move_completed,
};
pub use logging::setup_logging;
