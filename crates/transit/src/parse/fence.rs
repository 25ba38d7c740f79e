//! Markdown code fence removal.

const FENCE: &str = "```";

/// Strip a surrounding fenced code block and whitespace.
///
/// Handles an opening fence with an optional language tag (```` ```json ````)
/// and a closing fence. Text without fences is only trimmed, so applying
/// this twice gives the same result as applying it once.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }

    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest.trim_end();
    }

    text
}
