pub mod cli;
pub mod config;
pub mod processing;
pub mod progress;
pub mod stream;
pub mod utils;


pub use config::{Config, PriorityConfig};
pub use processing::{BatchReport, RemuxProcessor, RunOptions};
pub use stream::{select_tracks, RemuxPlan, SelectionResult, StreamCatalog};
pub use utils::{Error, FfmpegWrapper, Result};
