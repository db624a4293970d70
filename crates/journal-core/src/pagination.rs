//! Offset pagination with a fixed page size.

/// Rows per page for every paginated listing.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pagination {
    /// A zero limit is bumped to one.
    pub fn new(limit: usize) -> Self {
        Self {
            page: 0,
            limit: limit.max(1),
        }
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.page * self.limit
    }

    /// `ceil(total / limit)`, but at least one so "page 1 / 1" shows for
    /// an empty result.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.limit).max(1)
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self, total: usize) -> bool {
        (self.page + 1) * self.limit < total
    }

    /// Advance one page if allowed. Returns whether the page moved.
    pub fn next_page(&mut self, total: usize) -> bool {
        if self.can_go_next(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.can_go_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// `"Page 2 / 5"`.
    pub fn label(&self, total: usize) -> String {
        format!("Page {} / {}", self.page + 1, self.page_count(total))
    }
}
