use liteschema_core::{CatalogEntry, DatabaseSchema};
use schemars::schema_for;

#[test]
fn json_schema_describes_attribute_records() {
    let generated = schema_for!(DatabaseSchema);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");

    let definitions = json["definitions"]
        .as_object()
        .expect("schema definitions");
    assert!(definitions.contains_key("TableSchema"));
    assert!(definitions.contains_key("KeyRole"));

    let record = &definitions["AttributeRecord"]["properties"];
    for field in [
        "name",
        "declared_type",
        "nullable",
        "key_role",
        "default",
        "is_indexed",
        "extra",
        "comment",
    ] {
        assert!(record.get(field).is_some(), "missing property {field}");
    }

    let required: Vec<&str> = definitions["AttributeRecord"]["required"]
        .as_array()
        .expect("required list")
        .iter()
        .filter_map(|value| value.as_str())
        .collect();
    assert!(required.contains(&"name"));
    assert!(!required.contains(&"declared_type"));
}

#[test]
fn catalog_entry_schema_uses_catalog_column_names() {
    let generated = schema_for!(CatalogEntry);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");
    let properties = json["properties"].as_object().expect("properties");
    let mut keys: Vec<&str> = properties.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["name", "rootpage", "sql", "tbl_name", "type"]);
}
