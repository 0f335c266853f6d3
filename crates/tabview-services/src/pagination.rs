//! Pagination coordinator
//!
//! Derives page bounds from the latest result and clamps navigation.
//! Pages are 0-indexed.

use tabview_core::QueryResult;

use crate::query_state::DescriptorUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub total_elements: u64,
    pub page_size: u64,
    pub current_page: u64,
}

impl Pagination {
    pub fn new(total_elements: u64, page_size: u64, current_page: u64) -> Self {
        Self {
            total_elements,
            page_size: page_size.max(1),
            current_page,
        }
    }

    /// Bounds for the page the engine actually served
    pub fn from_result(result: &QueryResult) -> Self {
        Self::new(result.total_elements, result.page_size, result.current_page)
    }

    /// `ceil(total_elements / page_size)`, 0 for an empty table
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.page_size)
    }

    /// 1-based inclusive row range shown on the current page, or `None` when
    /// the page holds no rows
    pub fn row_range(&self) -> Option<(u64, u64)> {
        let first = self.current_page.saturating_mul(self.page_size) + 1;
        let last = self
            .current_page
            .saturating_add(1)
            .saturating_mul(self.page_size)
            .min(self.total_elements);
        (first <= last).then_some((first, last))
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page.saturating_add(1) < self.total_pages()
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 0
    }

    /// Update moving to the next page; `None` (disabled) on the last page
    pub fn next(&self) -> Option<DescriptorUpdate> {
        self.can_go_next()
            .then(|| DescriptorUpdate::page(self.current_page + 1))
    }

    /// Update moving to the previous page; `None` (disabled) on the first page
    pub fn previous(&self) -> Option<DescriptorUpdate> {
        self.can_go_prev()
            .then(|| DescriptorUpdate::page(self.current_page - 1))
    }

    /// Update jumping to `page`, clamped into range; `None` if already there
    pub fn go_to(&self, page: u64) -> Option<DescriptorUpdate> {
        let last = self.total_pages().saturating_sub(1);
        let target = page.min(last);
        (target != self.current_page).then(|| DescriptorUpdate::page(target))
    }

    /// "Showing 201 to 250 of 250 entries"
    pub fn summary(&self) -> String {
        match self.row_range() {
            Some((first, last)) => format!(
                "Showing {} to {} of {} entries",
                first, last, self.total_elements
            ),
            None => format!("Showing 0 of {} entries", self.total_elements),
        }
    }

    /// "Page 3 of 3"
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {}",
            self.current_page + 1,
            self.total_pages().max(1)
        )
    }
}
