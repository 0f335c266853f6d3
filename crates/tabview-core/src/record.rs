//! Row records returned by the engine

use serde_json::Value;

/// A single row: column name to JSON value, in engine column order.
pub type Record = serde_json::Map<String, Value>;

/// Fields that may carry a row identifier, in lookup order
pub const RECORD_ID_FIELDS: &[&str] = &["id", "_id"];

/// Resolve the identifier the engine uses to address `record`.
///
/// Looks at `id` first, then `_id`. String and numeric identifiers are
/// accepted; null, blank or structured values are not.
pub fn record_id(record: &Record) -> Option<String> {
    RECORD_ID_FIELDS.iter().find_map(|field| match record.get(*field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Display text for a cell. Missing and null cells render as empty.
pub fn cell_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("fixture must be an object"),
        }
    }

    #[test]
    fn test_record_id_prefers_id_over_underscore_id() {
        let row = record(json!({ "id": "a-1", "_id": "internal" }));
        assert_eq!(record_id(&row).as_deref(), Some("a-1"));
    }

    #[test]
    fn test_record_id_falls_back_to_underscore_id() {
        let row = record(json!({ "id": null, "_id": 42 }));
        assert_eq!(record_id(&row).as_deref(), Some("42"));
    }

    #[test]
    fn test_record_id_missing() {
        let row = record(json!({ "name": "Ada", "id": "  " }));
        assert_eq!(record_id(&row), None);
    }

    #[test]
    fn test_cell_text() {
        let row = record(json!({ "name": "Ada", "age": 36, "nick": null, "active": true }));
        assert_eq!(cell_text(&row, "name"), "Ada");
        assert_eq!(cell_text(&row, "age"), "36");
        assert_eq!(cell_text(&row, "nick"), "");
        assert_eq!(cell_text(&row, "active"), "true");
        assert_eq!(cell_text(&row, "missing"), "");
    }
}
