//! Column schema reported by the engine

use serde::{Deserialize, Serialize};

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    #[default]
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Timestamp,
    #[serde(other)]
    Other,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Other => "other",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Double)
    }
}

/// One column of the server-side table.
///
/// The capability flags govern which columns the filter builder and sort
/// cycle may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_true")]
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            sortable: true,
            filterable: true,
            searchable: true,
            width: None,
        }
    }
}

/// Names of the columns the engine allows filtering on, in schema order
pub fn filterable_columns(schema: &[ColumnDefinition]) -> Vec<String> {
    schema
        .iter()
        .filter(|c| c.filterable)
        .map(|c| c.name.clone())
        .collect()
}

/// Names of the columns the engine allows sorting on, in schema order
pub fn sortable_columns(schema: &[ColumnDefinition]) -> Vec<String> {
    schema
        .iter()
        .filter(|c| c.sortable)
        .map(|c| c.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_engine_json() {
        let schema: Vec<ColumnDefinition> = serde_json::from_value(json!([
            { "name": "id", "type": "STRING", "sortable": true, "filterable": false, "searchable": false },
            { "name": "score", "type": "DOUBLE", "sortable": true, "filterable": true, "searchable": false, "width": 120 },
            { "name": "blob", "type": "BINARY" }
        ]))
        .unwrap();

        assert_eq!(schema[1].column_type, ColumnType::Double);
        assert_eq!(schema[1].width, Some(120));
        assert_eq!(schema[2].column_type, ColumnType::Other);
        assert!(schema[2].filterable);
        assert_eq!(filterable_columns(&schema), vec!["score", "blob"]);
        assert_eq!(sortable_columns(&schema), vec!["id", "score", "blob"]);
    }
}
