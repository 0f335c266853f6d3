//! Sort cycle manager
//!
//! Each column header cycles unset -> ASC -> DESC -> unset, independent of
//! the other columns. Several columns may be sorted at once; `priority`
//! decides precedence, lowest number first.

use tabview_core::{ColumnDefinition, SortClause, SortDirection, sortable_columns};

use crate::error::ValidationError;

/// Advance `column` one step through its sort cycle.
///
/// - unset: appended as ASC with priority `len + 1`
/// - ASC: flipped to DESC in place, priority kept
/// - DESC: removed
///
/// After a removal the remaining clauses keep their relative order and are
/// renumbered 1..=n, so priorities stay contiguous and unique.
pub fn toggle_sort(sorts: &[SortClause], column: &str) -> Vec<SortClause> {
    let Some(existing) = sorts.iter().find(|s| s.column == column) else {
        let mut next = sorts.to_vec();
        next.push(SortClause::new(
            column,
            SortDirection::Ascending,
            sorts.len() as u32 + 1,
        ));
        return next;
    };

    match existing.direction {
        SortDirection::Ascending => sorts
            .iter()
            .map(|s| {
                if s.column == column {
                    SortClause {
                        direction: SortDirection::Descending,
                        ..s.clone()
                    }
                } else {
                    s.clone()
                }
            })
            .collect(),
        SortDirection::Descending => compact(sorts.iter().filter(|s| s.column != column)),
    }
}

/// Renumber priorities 1..=n following the current priority order
fn compact<'a>(sorts: impl Iterator<Item = &'a SortClause>) -> Vec<SortClause> {
    let mut remaining: Vec<SortClause> = sorts.cloned().collect();
    let mut by_priority: Vec<usize> = (0..remaining.len()).collect();
    by_priority.sort_by_key(|&i| remaining[i].priority);
    for (rank, index) in by_priority.into_iter().enumerate() {
        remaining[index].priority = rank as u32 + 1;
    }
    remaining
}

/// Current direction of `column`, if sorted
pub fn direction_of(sorts: &[SortClause], column: &str) -> Option<SortDirection> {
    sorts.iter().find(|s| s.column == column).map(|s| s.direction)
}

/// Header label with the sort marker, e.g. `name ↑`
pub fn header_label(sorts: &[SortClause], column: &str) -> String {
    match direction_of(sorts, column) {
        Some(direction) => format!("{} {}", column, direction.arrow()),
        None => column.to_string(),
    }
}

/// Sort cycle bound to the columns the schema marks sortable
#[derive(Debug, Clone, Default)]
pub struct SortCycle {
    sortable: Vec<String>,
}

impl SortCycle {
    pub fn new(schema: &[ColumnDefinition]) -> Self {
        Self {
            sortable: sortable_columns(schema),
        }
    }

    pub fn set_schema(&mut self, schema: &[ColumnDefinition]) {
        self.sortable = sortable_columns(schema);
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable.iter().any(|c| c == column)
    }

    /// `toggle_sort`, refusing columns the schema does not allow
    pub fn toggle(
        &self,
        sorts: &[SortClause],
        column: &str,
    ) -> Result<Vec<SortClause>, ValidationError> {
        if !self.is_sortable(column) {
            return Err(ValidationError::ColumnNotSortable(column.to_string()));
        }
        Ok(toggle_sort(sorts, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabview_core::ColumnType;

    fn asc(column: &str, priority: u32) -> SortClause {
        SortClause::new(column, SortDirection::Ascending, priority)
    }

    fn desc(column: &str, priority: u32) -> SortClause {
        SortClause::new(column, SortDirection::Descending, priority)
    }

    #[test]
    fn test_unset_column_is_appended_ascending() {
        let sorts = toggle_sort(&[asc("name", 1)], "age");
        assert_eq!(sorts, vec![asc("name", 1), asc("age", 2)]);
    }

    #[test]
    fn test_ascending_flips_in_place() {
        let sorts = toggle_sort(&[asc("name", 1), asc("age", 2)], "name");
        assert_eq!(sorts, vec![desc("name", 1), asc("age", 2)]);
    }

    #[test]
    fn test_descending_is_removed_and_priorities_compacted() {
        let sorts = toggle_sort(&[desc("name", 1), asc("age", 2), asc("city", 3)], "name");
        assert_eq!(sorts, vec![asc("age", 1), asc("city", 2)]);

        // The next appended column cannot collide with a surviving priority
        let sorts = toggle_sort(&sorts, "name");
        assert_eq!(sorts, vec![asc("age", 1), asc("city", 2), asc("name", 3)]);
    }

    #[test]
    fn test_three_toggles_close_the_cycle() {
        let originals = vec![
            vec![],
            vec![asc("a", 1)],
            vec![desc("a", 1), asc("b", 2)],
        ];
        for original in originals {
            for column in ["x", "y", "zz"] {
                let mut sorts = original.clone();
                for _ in 0..3 {
                    sorts = toggle_sort(&sorts, column);
                }
                assert_eq!(sorts, original, "cycle on column {column}");
            }
        }
    }

    #[test]
    fn test_other_columns_untouched() {
        let start = vec![asc("a", 1), desc("b", 2)];
        let after = toggle_sort(&start, "c");
        assert_eq!(&after[..2], &start[..]);
    }

    #[test]
    fn test_header_label() {
        let sorts = vec![asc("a", 1), desc("b", 2)];
        assert_eq!(header_label(&sorts, "a"), "a ↑");
        assert_eq!(header_label(&sorts, "b"), "b ↓");
        assert_eq!(header_label(&sorts, "c"), "c");
    }

    #[test]
    fn test_sort_cycle_respects_schema() {
        let mut notes = ColumnDefinition::new("notes", ColumnType::String);
        notes.sortable = false;
        let cycle = SortCycle::new(&[ColumnDefinition::new("name", ColumnType::String), notes]);

        assert_eq!(cycle.toggle(&[], "name"), Ok(vec![asc("name", 1)]));
        assert_eq!(
            cycle.toggle(&[], "notes"),
            Err(ValidationError::ColumnNotSortable("notes".into()))
        );
    }
}
