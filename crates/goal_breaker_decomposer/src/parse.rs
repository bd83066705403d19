//! Parsing of free-text model output into subtask titles.
//!
//! The model is asked for a numbered list, but nothing guarantees its
//! shape, so the rule here is a line heuristic rather than a grammar:
//!
//! 1. split on `\n` and trim each line
//! 2. skip blank lines
//! 3. if the line contains `.`, drop everything up to and including the
//!    first one, then trim again
//! 4. keep what is left if it is non-empty
//!
//! Step 3 also truncates titles whose text contains a period before any
//! ordinal (`"Read ch. 3"` becomes `"3"`). That matches the behaviour the
//! service has always had.

/// Parse raw model output into ordered subtask titles.
pub fn parse_subtasks(raw: &str) -> Vec<String> {
    raw.split('\n').filter_map(parse_line).collect()
}

/// Parse one line of model output; `None` when the line yields no title.
pub fn parse_line(line: &str) -> Option<String> {
    let cleaned = line.trim();
    if cleaned.is_empty() {
        return None;
    }

    let title = match cleaned.split_once('.') {
        Some((_, rest)) => rest.trim(),
        None => cleaned,
    };

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
