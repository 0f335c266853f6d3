//! Filter clause types
//!
//! Shared data structures for the descriptor's filter sequence and the
//! WHERE preview rendered from it.

use serde::{Deserialize, Serialize};

/// Filter operations understood by the remote engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperation {
    // Equality operators
    #[default]
    Equals,
    NotEquals,

    // String operators
    Contains,
    StartsWith,
    EndsWith,

    // Comparison operators
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // List operators
    In,
    NotIn,

    // NULL operators
    IsNull,
    IsNotNull,
}

impl FilterOperation {
    /// Get the display label for the operation
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::NotEquals => "Not Equals",
            Self::Contains => "Contains",
            Self::StartsWith => "Starts With",
            Self::EndsWith => "Ends With",
            Self::GreaterThan => "Greater Than",
            Self::GreaterThanOrEqual => "Greater Than or Equal",
            Self::LessThan => "Less Than",
            Self::LessThanOrEqual => "Less Than or Equal",
            Self::In => "In List",
            Self::NotIn => "Not In List",
            Self::IsNull => "Is Null",
            Self::IsNotNull => "Is Not Null",
        }
    }

    /// Wire code, as sent to the engine
    pub fn code(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::Contains => "CONTAINS",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::IsNull => "IS_NULL",
            Self::IsNotNull => "IS_NOT_NULL",
        }
    }

    /// Parse a wire code (case-insensitive, `-` accepted for `_`)
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_uppercase().replace('-', "_");
        Self::all().iter().copied().find(|op| op.code() == normalized)
    }

    /// Returns true if this operation requires a value input
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Returns true if the value input is a comma-separated list
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Get all available operations in display order
    pub fn all() -> &'static [FilterOperation] {
        &[
            Self::Equals,
            Self::NotEquals,
            Self::Contains,
            Self::StartsWith,
            Self::EndsWith,
            Self::GreaterThan,
            Self::GreaterThanOrEqual,
            Self::LessThan,
            Self::LessThanOrEqual,
            Self::In,
            Self::NotIn,
            Self::IsNull,
            Self::IsNotNull,
        ]
    }

    /// Render this operation as a SQL-like predicate over `column`.
    ///
    /// Only used for previews; the engine builds the real predicate.
    pub fn to_sql_fragment(&self, column: &str, values: &[String]) -> String {
        let escaped_col = format!("\"{}\"", column.replace('"', "\"\""));
        let first = values.first().map(String::as_str).unwrap_or_default();
        let escaped_val = escape_sql_value(first);

        match self {
            Self::Equals => format!("{} = {}", escaped_col, escaped_val),
            Self::NotEquals => format!("{} != {}", escaped_col, escaped_val),
            Self::GreaterThan => format!("{} > {}", escaped_col, escaped_val),
            Self::GreaterThanOrEqual => format!("{} >= {}", escaped_col, escaped_val),
            Self::LessThan => format!("{} < {}", escaped_col, escaped_val),
            Self::LessThanOrEqual => format!("{} <= {}", escaped_col, escaped_val),
            Self::Contains => format!("{} LIKE '%{}%'", escaped_col, escape_like_value(first)),
            Self::StartsWith => format!("{} LIKE '{}%'", escaped_col, escape_like_value(first)),
            Self::EndsWith => format!("{} LIKE '%{}'", escaped_col, escape_like_value(first)),
            Self::In | Self::NotIn => {
                let items: Vec<String> = values.iter().map(|v| escape_sql_value(v)).collect();
                let keyword = if *self == Self::In { "IN" } else { "NOT IN" };
                format!("{} {} ({})", escaped_col, keyword, items.join(", "))
            }
            Self::IsNull => format!("{} IS NULL", escaped_col),
            Self::IsNotNull => format!("{} IS NOT NULL", escaped_col),
        }
    }
}

/// Escape a value for SQL (wraps in quotes and escapes internal quotes)
fn escape_sql_value(value: &str) -> String {
    if value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok() {
        return value.to_string();
    }
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return value.to_uppercase();
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Escape special characters for LIKE pattern
fn escape_like_value(value: &str) -> String {
    value
        .replace('\'', "''")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Logical operator joining a filter to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

/// A single accepted filter.
///
/// `values` is empty exactly when `operation` is a null check. Clauses are
/// only built through the filter builder and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub column: String,
    pub operation: FilterOperation,
    pub values: Vec<String>,
    pub logical_operator: LogicalOperator,
}

impl FilterClause {
    /// Short human summary, e.g. `status equals "active"`
    pub fn summary(&self) -> String {
        let op = self.operation.label().to_lowercase();
        if self.values.is_empty() {
            format!("{} {}", self.column, op)
        } else {
            format!("{} {} \"{}\"", self.column, op, self.values.join(", "))
        }
    }

    /// Convert this clause to a WHERE fragment (preview only)
    pub fn to_sql(&self) -> String {
        self.operation.to_sql_fragment(&self.column, &self.values)
    }
}

/// Render a filter sequence as a WHERE preview.
///
/// Each clause's logical operator joins it to the clause before it; the first
/// clause's operator is ignored.
pub fn where_preview(filters: &[FilterClause]) -> Option<String> {
    let mut parts = filters.iter();
    let first = parts.next()?;
    let mut sql = first.to_sql();
    for clause in parts {
        sql.push(' ');
        sql.push_str(clause.logical_operator.sql());
        sql.push(' ');
        sql.push_str(&clause.to_sql());
    }
    Some(sql)
}
