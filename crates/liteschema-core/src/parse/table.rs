use std::sync::LazyLock;

use regex::Regex;

use super::scan::closing_delimiter;

static RE_FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(CONSTRAINT\s+\S+\s+)?FOREIGN\s+KEY\b").expect("valid FOREIGN KEY pattern")
});

/// One column definition cut out of a table's column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFragment {
    /// Trimmed definition text with comments removed.
    pub text: String,
    /// Comments that trailed the definition, joined by a space.
    pub comment: Option<String>,
}

/// Split a `CREATE TABLE` statement into its column fragments.
///
/// Comments are stripped from the parseable text and attached to the
/// fragment they follow. Foreign key clauses are dropped. A statement
/// without a parenthesized column list yields no fragments.
pub fn split_table_definition(ddl: &str) -> Vec<ColumnFragment> {
    let mut state = SplitState::default();
    let mut quote: Option<char> = None;
    let mut pos = 0;

    while let Some(ch) = ddl[pos..].chars().next() {
        let rest = &ddl[pos..];

        if let Some(close) = quote {
            state.push(ch);
            if ch == close {
                quote = None;
            }
            pos += ch.len_utf8();
            continue;
        }

        if rest.starts_with("--") {
            let end = rest.find('\n').unwrap_or(rest.len());
            state.attach_comment(&rest[2..end]);
            pos += end;
            continue;
        }

        if rest.starts_with("/*") {
            let (body, consumed) = match rest[2..].find("*/") {
                Some(end) => (&rest[2..2 + end], end + 4),
                None => (&rest[2..], rest.len()),
            };
            state.attach_comment(body);
            state.push(' ');
            pos += consumed;
            continue;
        }

        match ch {
            '(' => {
                state.depth += 1;
                if state.depth > 1 {
                    state.push(ch);
                }
            }
            ')' if state.depth == 1 => {
                state.finish_fragment();
                state.depth = 0;
                state.closed = true;
                break;
            }
            ')' => {
                state.push(ch);
                state.depth = state.depth.saturating_sub(1);
            }
            ',' if state.depth == 1 => state.finish_fragment(),
            _ => {
                quote = closing_delimiter(ch);
                state.push(ch);
            }
        }

        pos += ch.len_utf8();
    }

    if !state.closed {
        if state.opened {
            tracing::debug!("unbalanced column list, keeping the parsed fragments");
            state.finish_fragment();
        } else {
            tracing::debug!("no column list found in table definition");
        }
    }

    state
        .fragments
        .into_iter()
        .filter(|fragment| !is_foreign_key_clause(&fragment.text))
        .collect()
}

/// True for `FOREIGN KEY (...)` table constraints, optionally named.
pub fn is_foreign_key_clause(fragment: &str) -> bool {
    RE_FOREIGN_KEY.is_match(fragment.trim_start())
}

#[derive(Default)]
struct SplitState {
    fragments: Vec<ColumnFragment>,
    current: String,
    current_comment: Option<String>,
    depth: usize,
    opened: bool,
    closed: bool,
}

impl SplitState {
    fn push(&mut self, ch: char) {
        if self.depth == 0 {
            return;
        }
        self.opened = true;
        self.current.push(ch);
    }

    fn attach_comment(&mut self, raw: &str) {
        if self.depth == 0 {
            return;
        }
        let text = raw.trim();
        if text.is_empty() {
            return;
        }

        let slot = if !self.current.trim().is_empty() {
            &mut self.current_comment
        } else if let Some(previous) = self.fragments.last_mut() {
            &mut previous.comment
        } else {
            tracing::debug!(comment = text, "comment before the first column dropped");
            return;
        };

        match slot {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => *slot = Some(text.to_string()),
        }
    }

    fn finish_fragment(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.fragments.push(ColumnFragment {
                text: text.to_string(),
                comment: self.current_comment.take(),
            });
        }
        self.current.clear();
        self.current_comment = None;
    }
}
