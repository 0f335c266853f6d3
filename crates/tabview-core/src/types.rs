//! Descriptor and result types exchanged with the engine

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FilterClause, Record, SortClause, order_by_preview, where_preview};

/// Rows per page when nothing else has been chosen
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Page sizes offered to the user
pub const PAGE_SIZE_OPTIONS: &[u64] = &[50, 100, 200, 500];

/// Immutable snapshot of every query parameter sent to the engine.
///
/// Descriptors are never edited in place: the query state controller builds
/// a fresh one for each update and hands out shared snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    /// Priority-ordered; see `SortClause::priority`
    #[serde(default)]
    pub sorts: Vec<SortClause>,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            search_term: String::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryDescriptor {
    /// Row offset of the first row on `page`
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.page_size)
    }

    /// SQL-like rendering of the descriptor, for display and logs only.
    pub fn explain(&self) -> String {
        let mut sql = String::from("SELECT * FROM rows");
        let mut conditions = Vec::new();
        if let Some(filter_sql) = where_preview(&self.filters) {
            conditions.push(if self.filters.len() > 1 {
                format!("({})", filter_sql)
            } else {
                filter_sql
            });
        }
        let search = self.search_term.trim();
        if !search.is_empty() {
            conditions.push(format!(
                "ANY_COLUMN LIKE '%{}%'",
                search.replace('\'', "''")
            ));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if let Some(order_by) = order_by_preview(&self.sorts) {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by);
        }
        sql.push_str(&format!(" LIMIT {} OFFSET {}", self.page_size, self.offset()));
        sql
    }
}

/// One page of rows as reported by the engine.
///
/// Results are replaced wholesale by the next successful query and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(rename = "data", default)]
    pub rows: Vec<Record>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
    /// Page the engine actually applied
    #[serde(default)]
    pub current_page: u64,
    /// Page size the engine actually applied
    #[serde(default)]
    pub page_size: u64,
    #[serde(rename = "implementation", default)]
    pub implementation_label: String,
    #[serde(default)]
    pub query_time_ms: f64,
}

impl QueryResult {
    /// Create a new empty query result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Visible column names, taken from the first row. Columns starting with
    /// `_` are internal and hidden.
    pub fn visible_columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| {
                row.keys()
                    .filter(|key| !key.starts_with('_'))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reply to a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply to an export request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub file_name: String,
    pub file_path: String,
    pub format: String,
}

/// Session readiness as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub has_data: bool,
    #[serde(default)]
    pub implementation: String,
    #[serde(default)]
    pub column_count: u64,
}

/// Engine liveness
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub implementation: String,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }
}

/// Named engine metrics, in the order the engine reported them.
pub type Metrics = IndexMap<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterOperation, LogicalOperator, SortDirection};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_descriptor_default_and_wire_format() {
        let descriptor = QueryDescriptor::default();
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "filters": [],
                "sorts": [],
                "searchTerm": "",
                "page": 0,
                "pageSize": 100
            })
        );
    }

    #[test]
    fn test_descriptor_missing_fields_use_defaults() {
        let parsed: QueryDescriptor = serde_json::from_value(json!({ "page": 3 })).unwrap();
        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(parsed.offset(), 300);
    }

    #[test]
    fn test_explain() {
        let descriptor = QueryDescriptor {
            filters: vec![FilterClause {
                column: "age".into(),
                operation: FilterOperation::GreaterThanOrEqual,
                values: vec!["18".into()],
                logical_operator: LogicalOperator::And,
            }],
            sorts: vec![SortClause::new("name", SortDirection::Descending, 1)],
            search_term: "smith".into(),
            page: 2,
            page_size: 50,
        };
        assert_eq!(
            descriptor.explain(),
            "SELECT * FROM rows WHERE \"age\" >= 18 AND ANY_COLUMN LIKE '%smith%' \
             ORDER BY \"name\" DESC LIMIT 50 OFFSET 100"
        );
    }

    #[test]
    fn test_query_result_from_engine_json() {
        let result: QueryResult = serde_json::from_value(json!({
            "data": [{ "_id": "r1", "name": "Ada", "age": 36 }],
            "totalElements": 250,
            "totalPages": 3,
            "currentPage": 2,
            "pageSize": 100,
            "queryTimeMs": 12,
            "implementation": "H2"
        }))
        .unwrap();

        assert_eq!(result.total_elements, 250);
        assert_eq!(result.current_page, 2);
        assert_eq!(result.implementation_label, "H2");
        assert_eq!(result.query_time_ms, 12.0);
        assert_eq!(result.visible_columns(), vec!["name", "age"]);
    }
}
