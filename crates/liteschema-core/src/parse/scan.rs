//! Quote and parenthesis aware scanning primitives shared by the parsers.

/// Closing delimiter for a character that opens a quoted token.
///
/// SQLite accepts `'...'`, `"..."`, `[...]` and `` `...` `` around identifiers.
pub(crate) fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '\'' => Some('\''),
        '"' => Some('"'),
        '`' => Some('`'),
        '[' => Some(']'),
        _ => None,
    }
}

/// Byte offset of the first `(` that is not inside a quoted token.
pub(crate) fn find_open_paren(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in text.char_indices() {
        if let Some(close) = quote {
            if ch == close {
                quote = None;
            }
            continue;
        }
        if ch == '(' {
            return Some(idx);
        }
        quote = closing_delimiter(ch);
    }
    None
}

/// Byte offset of the `)` balancing the `(` at `open_at`.
pub(crate) fn matching_paren(text: &str, open_at: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (idx, ch) in text[open_at..].char_indices() {
        if let Some(close) = quote {
            if ch == close {
                quote = None;
            }
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open_at + idx);
                }
            }
            _ => quote = closing_delimiter(ch),
        }
    }
    None
}

/// Blank out quoted contents and everything nested inside parentheses.
///
/// Delimiters at the top level are kept and every blanked character is
/// replaced by as many spaces as its UTF-8 length, so byte offsets into the
/// masked text are valid offsets into the original.
pub(crate) fn mask_nested(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        let keep = match quote {
            Some(close) => {
                if ch == close {
                    quote = None;
                    depth == 0
                } else {
                    false
                }
            }
            None => match ch {
                '(' => {
                    depth += 1;
                    depth == 1
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    depth == 0
                }
                _ => {
                    quote = closing_delimiter(ch);
                    depth == 0
                }
            },
        };

        if keep {
            masked.push(ch);
        } else {
            masked.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        }
    }

    masked
}

/// Byte spans of the whitespace-separated tokens of `text`, treating quoted
/// tokens and parenthesized groups as part of the surrounding token.
pub(crate) fn top_level_tokens(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (idx, ch) in text.char_indices() {
        if let Some(close) = quote {
            if ch == close {
                quote = None;
            }
            continue;
        }

        if ch.is_whitespace() && depth == 0 {
            if let Some(begin) = start.take() {
                tokens.push((begin, idx));
            }
            continue;
        }

        if start.is_none() {
            start = Some(idx);
        }

        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => quote = closing_delimiter(ch),
        }
    }

    if let Some(begin) = start {
        tokens.push((begin, text.len()));
    }

    tokens
}
