//! Print the JSON Schemas of the extracted model and of raw catalog rows,
//! as printed by `liteschema --format json` and `liteschema --catalog`.

use liteschema_core::{CatalogEntry, DatabaseSchema};
use schemars::schema_for;
use serde_json::{Map, Value};

fn main() -> Result<(), serde_json::Error> {
    let mut schemas = Map::new();
    schemas.insert(
        "database_schema".to_string(),
        serde_json::to_value(schema_for!(DatabaseSchema))?,
    );
    schemas.insert(
        "catalog_entry".to_string(),
        serde_json::to_value(schema_for!(CatalogEntry))?,
    );
    println!("{}", serde_json::to_string_pretty(&Value::Object(schemas))?);
    Ok(())
}
