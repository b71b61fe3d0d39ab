//! Text cleanup and boundary-aware truncation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESIDUAL_TAG: Regex = Regex::new(r"</?[a-zA-Z][a-zA-Z0-9-]*(\s[^<>]*)?/?>").unwrap();
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop tag-like fragments that survived parsing (e.g. escaped markup).
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }
    collapse_whitespace(&RESIDUAL_TAG.replace_all(text, " "))
}

/// Cut `text` to at most `max_chars` characters.
///
/// Prefers the latest paragraph or sentence end, then the latest whitespace,
/// and only falls back to a hard cut when neither exists in the second half of
/// the allowed span. Returns the text and whether anything was removed.
pub fn truncate_at_boundary(text: &str, max_chars: usize) -> (String, bool) {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte, _)) => byte,
        None => return (text.to_string(), false),
    };

    let head = &text[..cut];
    let rest = &text[cut..];
    let floor = head
        .char_indices()
        .nth(max_chars / 2)
        .map(|(byte, _)| byte)
        .unwrap_or(0);

    let mut boundary = None;
    let mut whitespace = None;
    let mut chars = head.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|(_, n)| *n).or_else(|| rest.chars().next());
        if i < floor {
            continue;
        }
        if matches!(c, '.' | '!' | '?') && next.map_or(true, char::is_whitespace) {
            boundary = Some(i + c.len_utf8());
        } else if c == '\n' && next == Some('\n') {
            boundary = Some(i);
        } else if c.is_whitespace() {
            whitespace = Some(i);
        }
    }

    let end = boundary.or(whitespace).unwrap_or(cut);
    (head[..end].trim_end().to_string(), true)
}
