// Output formatting — terminal display of comparisons and profiles.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters rather than bytes, so names with multi-byte characters
/// never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Format a unit-scaled value as a whole percentage ("73%").
pub fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}
