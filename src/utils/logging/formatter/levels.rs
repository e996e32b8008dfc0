/// Processing level determination for hierarchical log output

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingLevel {
    Root,   // Top level operations
    Stage,  // Major processing stages
    Step,   // Individual steps within stages
    Detail, // Detailed information
}

/// Determines the processing level of a log message based on its content
pub fn determine_processing_level(message: &str) -> ProcessingLevel {
    // Root level - one line per file and per batch
    if message.starts_with("Processing file")
        || (message.starts_with("Found") && message.contains("file(s) to process"))
        || message.starts_with("Batch complete")
    {
        return ProcessingLevel::Root;
    }

    // Stage level - the remux itself
    if message.starts_with("Starting remux")
        || message.starts_with("Remux completed")
        || message.starts_with("Dry run")
    {
        return ProcessingLevel::Stage;
    }

    // Step level - probing and selection decisions
    if message.starts_with("Analyzing stream structure")
        || message.starts_with("Stream selection complete")
        || message.starts_with("Using selection profile")
        || message.starts_with("Injecting external subtitle")
        || message.starts_with("Moved completed files")
    {
        return ProcessingLevel::Step;
    }

    ProcessingLevel::Detail
}
