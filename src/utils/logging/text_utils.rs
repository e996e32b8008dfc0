//! Text wrapping for log formatting

/// Wraps text at word boundaries to `max_width` columns. Leading indentation
/// of each input line is repeated on its continuation lines.
pub fn wrap_text(text: &str, max_width: usize) -> String {
    let mut wrapped_lines = Vec::new();

    for line in text.lines() {
        if line.chars().count() <= max_width {
            wrapped_lines.push(line.to_string());
            continue;
        }

        let indent_len = line.len() - line.trim_start().len();
        let indent = &line[..indent_len];
        let mut current = String::from(indent);

        for word in line.split_whitespace() {
            let extra = if current.len() > indent_len { 1 } else { 0 };
            if current.len() > indent_len
                && current.chars().count() + extra + word.chars().count() > max_width
            {
                wrapped_lines.push(std::mem::replace(&mut current, String::from(indent)));
            }
            if current.len() > indent_len {
                current.push(' ');
            }
            current.push_str(word);
        }

        if current.len() > indent_len {
            wrapped_lines.push(current);
        }
    }

    wrapped_lines.join("\n")
}
