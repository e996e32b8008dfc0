pub mod loader;
pub mod priority;
pub mod selection_profiles;
pub mod types;

pub use loader::Config;
pub use priority::{ConversionRule, ExternalSubtitleConfig, PriorityConfig};
pub use selection_profiles::SelectionProfileManager;
pub use types::*;
