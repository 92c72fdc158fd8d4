//! Verbosity-parameterized projections of table schemas.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::schema::{AttributeRecord, DatabaseSchema, TableSchema};

/// Output formats understood by [`TableSchema::dumps`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    #[default]
    Markdown,
    Json,
}

/// How much of each column a projection shows.
///
/// Levels above [`Verbosity::Full`] render like it and negative levels like
/// [`Verbosity::TableName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    TableName = 0,
    Columns = 1,
    Types = 2,
    Constraints = 3,
    Full = 4,
}

impl Verbosity {
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Verbosity::TableName,
            1 => Verbosity::Columns,
            2 => Verbosity::Types,
            3 => Verbosity::Constraints,
            _ => Verbosity::Full,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

impl From<i64> for Verbosity {
    fn from(level: i64) -> Self {
        Verbosity::from_level(level)
    }
}

/// A projected column attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Type,
    Null,
    Key,
    Default,
    Index,
    Extra,
    Comment,
}

impl Field {
    pub fn header(self) -> &'static str {
        match self {
            Field::Name => "Field",
            Field::Type => "Type",
            Field::Null => "Null",
            Field::Key => "Key",
            Field::Default => "Default",
            Field::Index => "Index",
            Field::Extra => "Extra",
            Field::Comment => "Comment",
        }
    }

    fn cell(self, attribute: &AttributeRecord) -> Cell {
        match self {
            Field::Name => Cell::Text(attribute.name.clone()),
            Field::Type => attribute
                .declared_type
                .clone()
                .map_or(Cell::Empty, Cell::Text),
            Field::Null => Cell::Text(null_label(attribute).to_string()),
            Field::Key => Cell::Text(attribute.key_role.label().to_string()),
            Field::Default => Cell::Text(attribute.default.clone()),
            Field::Index => Cell::Flag(attribute.is_indexed),
            Field::Extra => Cell::Text(extra_label(attribute)),
            Field::Comment => attribute.comment.clone().map_or(Cell::Empty, Cell::Text),
        }
    }

    /// Word used for the field in one-line text renderings, if any.
    fn text_item(self, attribute: &AttributeRecord) -> Option<String> {
        match self {
            Field::Name => Some(attribute.name.clone()),
            Field::Type => attribute.declared_type.clone(),
            Field::Key => attribute.key_role.keyword().map(str::to_string),
            Field::Null => (!attribute.nullable).then(|| "NOT NULL".to_string()),
            _ => None,
        }
    }
}

const NAME_AND_TYPE: &[Field] = &[Field::Name, Field::Type];
const ALL_COLUMNS: &[Field] = &[
    Field::Name,
    Field::Type,
    Field::Null,
    Field::Key,
    Field::Default,
    Field::Index,
    Field::Extra,
];

/// Tabular field subset per verbosity level.
const TABULAR_FIELDS: [&[Field]; 5] = [
    NAME_AND_TYPE,
    ALL_COLUMNS,
    ALL_COLUMNS,
    ALL_COLUMNS,
    ALL_COLUMNS,
];

/// Text field subset per verbosity level.
const TEXT_FIELDS: [&[Field]; 5] = [
    &[],
    &[Field::Name],
    &[Field::Name, Field::Type],
    &[Field::Name, Field::Type, Field::Key, Field::Null],
    &[Field::Name, Field::Type, Field::Key, Field::Null],
];

fn null_label(attribute: &AttributeRecord) -> &'static str {
    if attribute.nullable { "YES" } else { "NO" }
}

fn extra_label(attribute: &AttributeRecord) -> String {
    attribute
        .extra
        .iter()
        .map(|flag| flag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A value in a [`TableData`] row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.pad(text),
            Cell::Flag(true) => f.pad("X"),
            Cell::Flag(false) | Cell::Empty => f.pad(""),
        }
    }
}

/// Headers plus value matrix for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub table_name: String,
    pub fields: Vec<Field>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableData {
    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.header()).collect()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, header: &str) -> Option<Vec<&Cell>> {
        let position = self
            .fields
            .iter()
            .position(|field| field.header() == header)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }

    /// Render as a markdown table under a `# <table>` heading.
    ///
    /// Pipes and line breaks in cell text are escaped so every row stays on
    /// one line; padding follows display width.
    pub fn to_markdown(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| escape_markdown(&cell.to_string()))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                rows.iter()
                    .map(|row| row[idx].width())
                    .chain([field.header().width(), 3])
                    .max()
                    .unwrap_or(3)
            })
            .collect();

        let mut out = format!("# {}\n", self.table_name);

        let header: Vec<String> = self
            .fields
            .iter()
            .zip(&widths)
            .map(|(field, &width)| pad_cell(field.header(), width, true))
            .collect();
        push_markdown_row(&mut out, &header);

        let separator: Vec<String> = self
            .fields
            .iter()
            .zip(&widths)
            .map(|(field, &width)| {
                if *field == Field::Index {
                    format!(":{}:", "-".repeat(width - 2))
                } else {
                    "-".repeat(width)
                }
            })
            .collect();
        push_markdown_row(&mut out, &separator);

        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&self.fields)
                .zip(&widths)
                .map(|((text, field), &width)| pad_cell(text, width, *field == Field::Index))
                .collect();
            push_markdown_row(&mut out, &cells);
        }

        out
    }
}

fn escape_markdown(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// Pad `text` to `width` display columns; centered text puts the odd
/// column on the right.
fn pad_cell(text: &str, width: usize, centered: bool) -> String {
    let fill = width.saturating_sub(text.width());
    let left = if centered { fill / 2 } else { 0 };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
}

fn push_markdown_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

impl TableSchema {
    /// `{table: [{Field, Type, Null, Key, Default, Index, Extra[, Comment]}]}`
    pub fn as_dict(&self) -> Value {
        let attributes = self.attributes.iter().map(attribute_map).collect();
        let mut dict = Map::new();
        dict.insert(self.name.clone(), Value::Array(attributes));
        Value::Object(dict)
    }

    pub fn as_table(&self, verbosity: Verbosity) -> TableData {
        let mut fields = TABULAR_FIELDS[verbosity as usize].to_vec();
        if verbosity > Verbosity::TableName
            && self.attributes.iter().any(|attribute| attribute.comment.is_some())
        {
            fields.push(Field::Comment);
        }

        let rows = self
            .attributes
            .iter()
            .map(|attribute| fields.iter().map(|field| field.cell(attribute)).collect())
            .collect();

        TableData {
            table_name: self.name.clone(),
            fields,
            rows,
        }
    }

    pub fn as_text(&self, verbosity: Verbosity) -> String {
        if verbosity == Verbosity::TableName {
            return self.name.clone();
        }

        let fields = TEXT_FIELDS[verbosity as usize];
        let items: Vec<String> = self
            .attributes
            .iter()
            .map(|attribute| {
                fields
                    .iter()
                    .filter_map(|field| field.text_item(attribute))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        if verbosity < Verbosity::Full {
            return format!("{} ({})", self.name, items.join(", "));
        }

        let body = items
            .iter()
            .map(|item| format!("    {item}"))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("{} (\n{body}\n)\n", self.name)
    }

    pub fn dumps(&self, format: OutputFormat, verbosity: Verbosity) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.as_text(verbosity)),
            OutputFormat::Markdown => Ok(self.as_table(verbosity).to_markdown()),
            OutputFormat::Json => to_json(&self.as_dict()),
        }
    }
}

impl DatabaseSchema {
    /// Table dicts merged into one object, in catalog order.
    pub fn as_dict(&self) -> Value {
        let mut dict = Map::new();
        for table in &self.tables {
            let attributes = table.attributes.iter().map(attribute_map).collect();
            dict.insert(table.name.clone(), Value::Array(attributes));
        }
        Value::Object(dict)
    }

    pub fn dumps(&self, format: OutputFormat, verbosity: Verbosity) -> Result<String> {
        if format == OutputFormat::Json {
            return to_json(&self.as_dict());
        }

        let rendered = self
            .tables
            .iter()
            .map(|table| table.dumps(format, verbosity))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }
}

fn attribute_map(attribute: &AttributeRecord) -> Value {
    let mut map = Map::new();
    map.insert(Field::Name.header().into(), Value::from(attribute.name.clone()));
    map.insert(
        Field::Type.header().into(),
        attribute
            .declared_type
            .clone()
            .map_or(Value::Null, Value::from),
    );
    map.insert(Field::Null.header().into(), Value::from(null_label(attribute)));
    map.insert(Field::Key.header().into(), Value::from(attribute.key_role.label()));
    map.insert(Field::Default.header().into(), Value::from(attribute.default.clone()));
    map.insert(Field::Index.header().into(), Value::from(attribute.is_indexed));
    map.insert(Field::Extra.header().into(), Value::from(extra_label(attribute)));
    if let Some(comment) = &attribute.comment {
        map.insert(Field::Comment.header().into(), Value::from(comment.clone()));
    }
    Value::Object(map)
}

fn to_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| Error::Other(err.to_string()))
}
