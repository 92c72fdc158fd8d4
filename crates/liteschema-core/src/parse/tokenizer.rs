use super::scan::closing_delimiter;

/// Split the leading identifier off a comment-free column fragment.
///
/// Quoted identifiers (`'a'`, `"a"`, `[a]`, `` `a` ``) are checked first and
/// run to the matching closing delimiter, where a doubled `''`, `""` or
/// ` `` ` stands for one literal quote; anything else is the first
/// whitespace-delimited word. Returns `None` for a blank fragment. The name
/// may be empty (`''`), which callers treat as malformed.
pub fn split_identifier(fragment: &str) -> Option<(String, &str)> {
    let fragment = fragment.trim();
    let first = fragment.chars().next()?;

    if let Some(close) = closing_delimiter(first) {
        let body = &fragment[first.len_utf8()..];
        if let Some((name, remainder)) = split_quoted(body, first, close) {
            return Some((name, remainder.trim()));
        }
    }

    match fragment.split_once(char::is_whitespace) {
        Some((name, remainder)) => Some((name.to_string(), remainder.trim())),
        None => Some((fragment.to_string(), "")),
    }
}

/// Unquote `body` up to its closing delimiter; `None` when unterminated.
fn split_quoted(body: &str, open: char, close: char) -> Option<(String, &str)> {
    let mut name = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != close {
            name.push(ch);
            continue;
        }
        // brackets have no escape form
        if open == close && chars.peek().is_some_and(|&(_, next)| next == close) {
            chars.next();
            name.push(close);
            continue;
        }
        return Some((name, &body[idx + close.len_utf8()..]));
    }
    None
}
