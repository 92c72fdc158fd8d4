use std::collections::BTreeSet;

use liteschema_core::{AttributeRecord, DatabaseSchema, ExtraFlag, KeyRole, TableSchema};

#[test]
fn serializes_schema_deterministically() {
    let schema = DatabaseSchema {
        engine: "sqlite".to_string(),
        tables: vec![TableSchema::new(
            "t",
            vec![AttributeRecord {
                name: "id".to_string(),
                declared_type: Some("INTEGER".to_string()),
                nullable: true,
                key_role: KeyRole::Primary,
                default: "NULL".to_string(),
                is_indexed: true,
                extra: BTreeSet::from([ExtraFlag::AutoIncrement]),
                comment: None,
            }],
        )],
    };

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"{
  "engine": "sqlite",
  "tables": [
    {
      "name": "t",
      "attributes": [
        {
          "name": "id",
          "declared_type": "INTEGER",
          "nullable": true,
          "key_role": "primary",
          "default": "NULL",
          "is_indexed": true,
          "extra": [
            "AUTOINCREMENT"
          ],
          "comment": null
        }
      ]
    }
  ]
}"#;
    assert_eq!(json, expected);

    let decoded: DatabaseSchema = serde_json::from_str(&json).expect("deserialize schema");
    assert_eq!(decoded, schema);
}
