//! Sort clause types

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Header marker shown next to a sorted column
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// A single sort criterion.
///
/// At most one clause exists per column. `priority` starts at 1; lower
/// numbers take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortClause {
    pub column: String,
    pub direction: SortDirection,
    pub priority: u32,
}

impl SortClause {
    pub fn new(column: impl Into<String>, direction: SortDirection, priority: u32) -> Self {
        Self {
            column: column.into(),
            direction,
            priority,
        }
    }

    /// Convert to SQL ORDER BY fragment
    pub fn to_sql(&self) -> String {
        let escaped_col = format!("\"{}\"", self.column.replace('"', "\"\""));
        format!("{} {}", escaped_col, self.direction.label())
    }
}

/// Render a sort sequence as an ORDER BY preview, ordered by priority.
pub fn order_by_preview(sorts: &[SortClause]) -> Option<String> {
    if sorts.is_empty() {
        return None;
    }
    let mut ordered: Vec<&SortClause> = sorts.iter().collect();
    ordered.sort_by_key(|s| s.priority);
    Some(
        ordered
            .iter()
            .map(|s| s.to_sql())
            .collect::<Vec<_>>()
            .join(", "),
    )
}
