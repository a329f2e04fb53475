//! Display titles for chat records.

/// Maximum number of words kept in a generated title.
const TITLE_WORDS: usize = 4;

/// Derive a short display title from the first words of `text`.
///
/// Multi-word text is cut to its first four whitespace-separated words,
/// joined by single spaces. Text with a single word (or none) is returned
/// verbatim, whatever its length.
pub fn summarize(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let title = if words.len() > 1 {
        words
            .iter()
            .take(TITLE_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_owned()
    };
    tracing::debug!(title = %title, "generated chat title");
    title
}
