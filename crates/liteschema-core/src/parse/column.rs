use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::schema::{AttributeRecord, ExtraFlag, KeyRole};

use super::scan::{mask_nested, top_level_tokens};
use super::table::ColumnFragment;
use super::tokenizer::split_identifier;

static RE_NOT_NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").expect("valid NOT NULL pattern"));
static RE_PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("valid PRIMARY KEY pattern"));
static RE_UNIQUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNIQUE\b").expect("valid UNIQUE pattern"));
static RE_AUTO_INCREMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAUTOINCREMENT\b").expect("valid AUTOINCREMENT pattern"));
static RE_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\b").expect("valid DEFAULT pattern"));

/// Keywords that open a column constraint clause.
const CONSTRAINT_KEYWORDS: &[&str] = &[
    "CONSTRAINT",
    "PRIMARY",
    "NOT",
    "NULL",
    "UNIQUE",
    "CHECK",
    "DEFAULT",
    "COLLATE",
    "REFERENCES",
    "GENERATED",
    "AS",
    "AUTOINCREMENT",
];

/// Sentinel default for nullable columns without an explicit default.
pub const NULL_DEFAULT: &str = "NULL";

/// A column definition split into name, declared type and constraint text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnParts<'a> {
    pub name: String,
    pub declared_type: Option<&'a str>,
    pub constraints: &'a str,
}

/// Split a comment-free column fragment into its parts.
pub fn split_column_definition(fragment: &str) -> Result<ColumnParts<'_>> {
    let (name, remainder) = split_identifier(fragment)
        .ok_or_else(|| Error::MalformedDefinition("empty column definition".to_string()))?;

    if name.trim().is_empty() {
        return Err(Error::MalformedDefinition(format!(
            "no column name in '{fragment}'"
        )));
    }

    let (declared_type, constraints) = split_declared_type(remainder);

    Ok(ColumnParts {
        name,
        declared_type,
        constraints,
    })
}

/// Parse one column fragment into an attribute record.
///
/// `is_indexed` only reflects the key role here; index statements are
/// cross-referenced by the assembler.
pub fn parse_column(fragment: &ColumnFragment) -> Result<AttributeRecord> {
    let parts = split_column_definition(&fragment.text)?;
    Ok(parts.into_record(fragment.comment.clone()))
}

impl ColumnParts<'_> {
    pub fn into_record(self, comment: Option<String>) -> AttributeRecord {
        let constraints = ConstraintText::new(self.constraints);
        let nullable = !constraints.is_not_null();
        let key_role = constraints.key_role();
        let default = constraints
            .default_value()
            .map(str::to_string)
            .unwrap_or_else(|| {
                if nullable {
                    NULL_DEFAULT.to_string()
                } else {
                    String::new()
                }
            });

        AttributeRecord {
            name: self.name,
            declared_type: self.declared_type.map(str::to_string),
            nullable,
            key_role,
            default,
            is_indexed: key_role.implies_index(),
            extra: constraints.extra_flags(),
            comment,
        }
    }
}

fn split_declared_type(remainder: &str) -> (Option<&str>, &str) {
    let remainder = remainder.trim();
    let tokens = top_level_tokens(remainder);
    let Some(&(start, mut end)) = tokens.first() else {
        return (None, "");
    };

    if is_constraint_keyword(&remainder[start..end]) {
        return (None, remainder);
    }

    // size suffix separated from the type name: `VARCHAR (5)`
    if let Some(&(next_start, next_end)) = tokens.get(1) {
        if remainder[next_start..].starts_with('(') {
            end = next_end;
        }
    }

    (Some(&remainder[..end]), remainder[end..].trim())
}

fn is_constraint_keyword(token: &str) -> bool {
    let word = token.split('(').next().unwrap_or(token).trim();
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Constraint text with a masked copy used for keyword scans, so keywords
/// inside literals or nested expressions are not picked up.
struct ConstraintText<'a> {
    raw: &'a str,
    masked: String,
}

impl<'a> ConstraintText<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            masked: mask_nested(raw),
        }
    }

    fn is_not_null(&self) -> bool {
        RE_NOT_NULL.is_match(&self.masked)
    }

    fn key_role(&self) -> KeyRole {
        if RE_PRIMARY_KEY.is_match(&self.masked) {
            KeyRole::Primary
        } else if RE_UNIQUE.is_match(&self.masked) {
            KeyRole::Unique
        } else {
            KeyRole::None
        }
    }

    fn extra_flags(&self) -> BTreeSet<ExtraFlag> {
        let mut flags = BTreeSet::new();
        if RE_AUTO_INCREMENT.is_match(&self.masked) {
            flags.insert(ExtraFlag::AutoIncrement);
        }
        flags
    }

    /// Text after `DEFAULT` up to the next constraint keyword.
    fn default_value(&self) -> Option<&'a str> {
        let found = RE_DEFAULT.find(&self.masked)?;
        let rest = &self.raw[found.end()..];
        let tokens = top_level_tokens(rest);
        let &(start, first_end) = tokens.first()?;

        let end = tokens
            .iter()
            .skip(1)
            .take_while(|(s, e)| !is_constraint_keyword(&rest[*s..*e]))
            .last()
            .map_or(first_end, |(_, e)| *e);

        Some(rest[start..end].trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fragment: &str) -> AttributeRecord {
        split_column_definition(fragment)
            .expect("column parts")
            .into_record(None)
    }

    #[test]
    fn primary_key_autoincrement_column() {
        let attr = record("id INTEGER PRIMARY KEY AUTOINCREMENT");
        assert_eq!(attr.name, "id");
        assert_eq!(attr.declared_type.as_deref(), Some("INTEGER"));
        assert!(attr.nullable);
        assert_eq!(attr.key_role, KeyRole::Primary);
        assert_eq!(attr.default, "NULL");
        assert!(attr.is_indexed);
        assert!(attr.extra.contains(&ExtraFlag::AutoIncrement));
    }

    #[test]
    fn not_null_without_default_has_empty_default() {
        let attr = record("name TEXT NOT NULL");
        assert!(!attr.nullable);
        assert_eq!(attr.default, "");
        assert_eq!(attr.key_role, KeyRole::None);
        assert!(!attr.is_indexed);
    }

    #[test]
    fn constraint_order_does_not_matter() {
        let left = record("a INTEGER UNIQUE NOT NULL DEFAULT 5");
        let right = record("a INTEGER DEFAULT 5 NOT NULL UNIQUE");
        for attr in [&left, &right] {
            assert!(!attr.nullable);
            assert_eq!(attr.key_role, KeyRole::Unique);
            assert_eq!(attr.default, "5");
        }
        assert_eq!(left, right);
    }

    #[test]
    fn primary_key_wins_over_unique() {
        assert_eq!(record("a INTEGER UNIQUE PRIMARY KEY").key_role, KeyRole::Primary);
    }

    #[test]
    fn default_keeps_literals_and_expressions_whole() {
        assert_eq!(record("note TEXT DEFAULT 'x'").default, "'x'");
        assert_eq!(
            record("note TEXT DEFAULT 'not null here' NOT NULL").default,
            "'not null here'"
        );
        assert_eq!(
            record("at TEXT DEFAULT (datetime('now', 'localtime')) NOT NULL").default,
            "(datetime('now', 'localtime'))"
        );
        assert_eq!(record("n INTEGER DEFAULT -1 CHECK (n < 10)").default, "-1");
        assert_eq!(record("flag INTEGER DEFAULT NULL").default, "NULL");
        assert_eq!(record("ts DATETIME DEFAULT CURRENT_TIMESTAMP").default, "CURRENT_TIMESTAMP");
    }

    #[test]
    fn keywords_inside_literals_are_ignored() {
        let attr = record("note TEXT DEFAULT 'PRIMARY KEY NOT NULL UNIQUE'");
        assert!(attr.nullable);
        assert_eq!(attr.key_role, KeyRole::None);
    }

    #[test]
    fn check_expression_does_not_imply_not_null() {
        let attr = record("a INTEGER CHECK (a IS NOT NULL)");
        assert!(attr.nullable);
    }

    #[test]
    fn lowercase_keywords_are_recognized() {
        let attr = record("id integer primary key autoincrement not null");
        assert_eq!(attr.declared_type.as_deref(), Some("integer"));
        assert!(!attr.nullable);
        assert_eq!(attr.key_role, KeyRole::Primary);
        assert_eq!(attr.extra.len(), 1);
    }

    #[test]
    fn column_without_type_or_constraints() {
        let attr = record("id");
        assert_eq!(attr.name, "id");
        assert_eq!(attr.declared_type, None);
        assert!(attr.nullable);
        assert_eq!(attr.key_role, KeyRole::None);
        assert_eq!(attr.default, "NULL");
        assert!(!attr.is_indexed);
        assert!(attr.extra.is_empty());
    }

    #[test]
    fn constraints_without_type() {
        let parts = split_column_definition("id PRIMARY KEY").expect("parts");
        assert_eq!(parts.declared_type, None);
        assert_eq!(parts.constraints, "PRIMARY KEY");
    }

    #[test]
    fn parenthesized_type_suffix_stays_with_type() {
        let parts = split_column_definition("price DECIMAL(10, 2) NOT NULL").expect("parts");
        assert_eq!(parts.declared_type, Some("DECIMAL(10, 2)"));
        assert_eq!(parts.constraints, "NOT NULL");

        let parts = split_column_definition("code VARCHAR (5)").expect("parts");
        assert_eq!(parts.declared_type, Some("VARCHAR (5)"));
        assert_eq!(parts.constraints, "");
    }

    #[test]
    fn rejoined_parts_reproduce_fragment() {
        for fragment in [
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "name   TEXT  NOT NULL   DEFAULT 'a b'",
            "body VARCHAR(140)",
            "total REAL DEFAULT 0 CHECK (total >= 0) UNIQUE",
        ] {
            let parts = split_column_definition(fragment).expect("parts");
            let rejoined = [
                Some(parts.name.as_str()),
                parts.declared_type,
                Some(parts.constraints),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            let normalize = |text: &str| text.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(normalize(&rejoined), normalize(fragment));
        }
    }

    #[test]
    fn empty_quoted_name_is_malformed() {
        assert!(matches!(
            split_column_definition("'' INTEGER"),
            Err(Error::MalformedDefinition(_))
        ));
        assert!(matches!(
            split_column_definition("  "),
            Err(Error::MalformedDefinition(_))
        ));
    }

    #[test]
    fn comment_is_carried_into_record() {
        let fragment = ColumnFragment {
            text: "a TEXT".to_string(),
            comment: Some("note".to_string()),
        };
        let attr = parse_column(&fragment).expect("record");
        assert_eq!(attr.comment.as_deref(), Some("note"));
    }
}
