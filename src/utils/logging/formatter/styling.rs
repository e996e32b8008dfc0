//! Styling for log messages

use console::{style, StyledObject};
use tracing::Level;

use super::levels::ProcessingLevel;

/// Level badge shown before the message. INFO has none.
pub fn format_level(level: &Level, use_color: bool) -> String {
    let badge = match *level {
        Level::ERROR => style("ERROR").red().bold(),
        Level::WARN => style("WARN ").yellow(),
        Level::INFO => return String::new(),
        Level::DEBUG => style("DEBUG").blue(),
        Level::TRACE => style("TRACE").magenta(),
    };
    colorize(badge, use_color)
}

pub fn get_tree_prefix(level: ProcessingLevel) -> &'static str {
    match level {
        ProcessingLevel::Root => "▶",
        ProcessingLevel::Stage => "●",
        ProcessingLevel::Step | ProcessingLevel::Detail => " ",
    }
}

/// Root lines are uppercased when color is off so files stay easy to spot.
pub fn style_message(message: &str, level: ProcessingLevel, use_color: bool) -> String {
    if !use_color {
        return match level {
            ProcessingLevel::Root => message.to_uppercase(),
            _ => message.to_string(),
        };
    }

    let styled = match level {
        ProcessingLevel::Root => style(message).bold().cyan(),
        ProcessingLevel::Stage => style(message).bold().green(),
        ProcessingLevel::Step => style(message).cyan(),
        ProcessingLevel::Detail => style(message).dim(),
    };
    styled.force_styling(true).to_string()
}

fn colorize(object: StyledObject<&str>, use_color: bool) -> String {
    object.force_styling(use_color).to_string()
}
