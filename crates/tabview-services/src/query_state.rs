//! Query state controller
//!
//! Owns the single authoritative `QueryDescriptor`. Every change arrives as a
//! partial `DescriptorUpdate` and produces a brand new descriptor snapshot;
//! the previous snapshot is never touched, so anything still holding it (an
//! in-flight request, for instance) keeps seeing a consistent value.

use std::sync::Arc;

use tabview_core::{FilterClause, QueryDescriptor, SortClause};

/// A partial set of descriptor fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorUpdate {
    pub filters: Option<Vec<FilterClause>>,
    pub sorts: Option<Vec<SortClause>>,
    pub search_term: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl DescriptorUpdate {
    pub fn filters(filters: Vec<FilterClause>) -> Self {
        Self {
            filters: Some(filters),
            ..Default::default()
        }
    }

    pub fn sorts(sorts: Vec<SortClause>) -> Self {
        Self {
            sorts: Some(sorts),
            ..Default::default()
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn page(page: u64) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn page_size(page_size: u64) -> Self {
        Self {
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// Whether this update changes which rows match (and so invalidates the page)
    pub fn touches_query(&self) -> bool {
        self.filters.is_some() || self.sorts.is_some() || self.search_term.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct QueryStateController {
    current: Arc<QueryDescriptor>,
}

impl Default for QueryStateController {
    fn default() -> Self {
        Self::new(QueryDescriptor::default())
    }
}

impl QueryStateController {
    pub fn new(initial: QueryDescriptor) -> Self {
        Self {
            current: Arc::new(initial),
        }
    }

    /// The current descriptor snapshot
    pub fn current(&self) -> &Arc<QueryDescriptor> {
        &self.current
    }

    /// Replace the descriptor wholesale, e.g. to restore a saved view
    pub fn reset(&mut self, descriptor: QueryDescriptor) -> Arc<QueryDescriptor> {
        self.current = Arc::new(QueryDescriptor {
            page_size: descriptor.page_size.max(1),
            ..descriptor
        });
        Arc::clone(&self.current)
    }

    /// Merge `update` into the descriptor and return the new snapshot.
    ///
    /// Touching filters, sorts or the search term forces `page` to 0, and so
    /// does changing the page size. A pure page change leaves every other
    /// field as it was. A page size of 0 is raised to 1.
    pub fn apply_update(&mut self, update: DescriptorUpdate) -> Arc<QueryDescriptor> {
        let previous = self.current.as_ref();
        let resets_page = update.touches_query() || update.page_size.is_some();

        let next = QueryDescriptor {
            filters: update.filters.unwrap_or_else(|| previous.filters.clone()),
            sorts: update.sorts.unwrap_or_else(|| previous.sorts.clone()),
            search_term: update
                .search_term
                .unwrap_or_else(|| previous.search_term.clone()),
            page: if resets_page {
                0
            } else {
                update.page.unwrap_or(previous.page)
            },
            page_size: update.page_size.unwrap_or(previous.page_size).max(1),
        };

        tracing::debug!(
            filters = next.filters.len(),
            sorts = next.sorts.len(),
            page = next.page,
            page_size = next.page_size,
            "descriptor updated"
        );

        self.current = Arc::new(next);
        Arc::clone(&self.current)
    }
}
