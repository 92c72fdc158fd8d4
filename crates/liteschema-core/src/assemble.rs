use crate::catalog::CatalogSnapshot;
use crate::error::{Error, Result};
use crate::parse::{is_column_indexed, parse_column, split_table_definition};
use crate::schema::{TableSchema, is_system_table};

/// Build the schema of `table_name` from a catalog snapshot.
///
/// System tables yield an empty schema. Unknown names and views fail with
/// [`Error::NotFound`]. Fragments that do not yield a column name are skipped
/// without failing the table.
pub fn assemble_table(snapshot: &CatalogSnapshot, table_name: &str) -> Result<TableSchema> {
    if is_system_table(table_name) {
        tracing::debug!(table = table_name, "skip sqlite system table");
        return Ok(TableSchema::new(table_name, Vec::new()));
    }

    let ddl = snapshot.table_ddl(table_name).ok_or_else(|| {
        if snapshot.is_view(table_name) {
            Error::NotFound(format!("'{table_name}' is a view without column definitions"))
        } else {
            Error::NotFound(format!("'{table_name}' table not found in the catalog"))
        }
    })?;

    let index_statements = snapshot.index_ddls(table_name);
    let mut attributes = Vec::new();

    for fragment in split_table_definition(ddl) {
        let mut record = match parse_column(&fragment) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(
                    table = table_name,
                    fragment = %fragment.text,
                    error = %err,
                    "skip column definition"
                );
                continue;
            }
        };

        if !record.is_indexed {
            record.is_indexed = is_column_indexed(&record.name, &index_statements);
        }
        attributes.push(record);
    }

    Ok(TableSchema::new(table_name, attributes))
}
