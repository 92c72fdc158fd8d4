use regex::Regex;

use super::scan::{find_open_paren, matching_paren};

/// Matches a column name as a whole identifier token inside index column
/// lists.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    pattern: Regex,
}

impl ColumnMatcher {
    pub fn new(column: &str) -> Option<Self> {
        let pattern = format!(
            r"(?:^|[^\p{{L}}\p{{N}}_$]){}(?:[^\p{{L}}\p{{N}}_$]|$)",
            regex::escape(column)
        );
        Regex::new(&pattern).ok().map(|pattern| Self { pattern })
    }

    /// True when the column list of `statement` references the column.
    pub fn is_referenced_by(&self, statement: &str) -> bool {
        index_column_list(statement).is_some_and(|columns| self.pattern.is_match(columns))
    }
}

/// Column list of a `CREATE INDEX` statement, without the parentheses.
///
/// Only the first parenthesized group is returned, so the index name and a
/// partial-index `WHERE` clause are never searched.
pub fn index_column_list(statement: &str) -> Option<&str> {
    let open = find_open_paren(statement)?;
    let close = matching_paren(statement, open).unwrap_or(statement.len());
    Some(&statement[open + 1..close])
}

/// True when any of `index_statements` references `column`.
pub fn is_column_indexed(column: &str, index_statements: &[&str]) -> bool {
    let Some(matcher) = ColumnMatcher::new(column) else {
        return false;
    };
    index_statements
        .iter()
        .any(|statement| matcher.is_referenced_by(statement))
}
