//! Message filtering to remove noisy log output

/// Returns true if the message should be displayed, false if it should be filtered out
pub fn should_show_message(message: &str) -> bool {
    // Container warnings ffmpeg repeats for every cluster of a remux
    let noise_patterns = [
        "Invalid Block Addition value",
        "Could not find codec parameters for stream",
        "Consider increasing the value for the 'analyzeduration'",
        "Starting new cluster due to timestamp",
        "matroska,webm",
    ];

    !noise_patterns
        .iter()
        .any(|pattern| message.contains(pattern))
}
