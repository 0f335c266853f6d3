//! Filter builder
//!
//! Validates user-entered filter drafts and assembles accepted ones into the
//! descriptor's filter sequence. Only columns the schema marks filterable can
//! be referenced.

use tabview_core::{
    ColumnDefinition, FilterClause, FilterOperation, LogicalOperator, filterable_columns,
};

use crate::error::ValidationError;

/// The "add filter" form as the user is filling it in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    /// Empty means "Select column..."
    pub column: String,
    pub operation: FilterOperation,
    pub value: String,
    pub logical_operator: LogicalOperator,
}

impl FilterDraft {
    pub fn new(
        column: impl Into<String>,
        operation: FilterOperation,
        value: impl Into<String>,
        logical_operator: LogicalOperator,
    ) -> Self {
        Self {
            column: column.into(),
            operation,
            value: value.into(),
            logical_operator,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    available_columns: Vec<String>,
    draft: FilterDraft,
}

impl FilterBuilder {
    pub fn new(schema: &[ColumnDefinition]) -> Self {
        Self {
            available_columns: filterable_columns(schema),
            draft: FilterDraft::default(),
        }
    }

    /// Replace the column list after a schema (re)load
    pub fn set_schema(&mut self, schema: &[ColumnDefinition]) {
        self.available_columns = filterable_columns(schema);
        if !self.draft.column.is_empty() && !self.is_available(&self.draft.column) {
            self.draft.column.clear();
        }
    }

    /// Columns offered in the column picker
    pub fn available_columns(&self) -> &[String] {
        &self.available_columns
    }

    pub fn is_available(&self, column: &str) -> bool {
        self.available_columns.iter().any(|c| c == column)
    }

    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FilterDraft {
        &mut self.draft
    }

    /// Check a draft and build the clause it describes
    pub fn validate(&self, draft: &FilterDraft) -> Result<FilterClause, ValidationError> {
        if draft.column.is_empty() {
            return Err(ValidationError::MissingColumn);
        }
        if !self.is_available(&draft.column) {
            return Err(ValidationError::ColumnNotFilterable(draft.column.clone()));
        }

        let values = if !draft.operation.requires_value() {
            Vec::new()
        } else if draft.operation.takes_list() {
            draft
                .value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        } else if draft.value.trim().is_empty() {
            Vec::new()
        } else {
            vec![draft.value.clone()]
        };

        if draft.operation.requires_value() && values.is_empty() {
            return Err(ValidationError::EmptyFilterValue);
        }

        Ok(FilterClause {
            column: draft.column.clone(),
            operation: draft.operation,
            values,
            logical_operator: draft.logical_operator,
        })
    }

    /// Whether the "Add Filter" action is enabled for the current draft
    pub fn can_add(&self) -> bool {
        self.validate(&self.draft).is_ok()
    }

    /// Append `draft` to `filters`.
    ///
    /// Returns `None` when the draft is rejected; rejection is a disabled
    /// action, not an error, so nothing is reported.
    pub fn add_filter(
        &self,
        filters: &[FilterClause],
        draft: &FilterDraft,
    ) -> Option<Vec<FilterClause>> {
        let clause = self.validate(draft).ok()?;
        let mut next = filters.to_vec();
        next.push(clause);
        Some(next)
    }

    /// Submit the builder's own draft, resetting the form when accepted
    pub fn submit(&mut self, filters: &[FilterClause]) -> Option<Vec<FilterClause>> {
        let next = self.add_filter(filters, &self.draft)?;
        self.draft = FilterDraft::default();
        Some(next)
    }
}

/// Remove the clause at `index`, keeping the others in order.
///
/// Returns `None` if `index` is out of range.
pub fn remove_filter(filters: &[FilterClause], index: usize) -> Option<Vec<FilterClause>> {
    if index >= filters.len() {
        return None;
    }
    Some(
        filters
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, clause)| clause.clone())
            .collect(),
    )
}

/// Drop every clause
pub fn clear_all() -> Vec<FilterClause> {
    Vec::new()
}
