//! Page cursor over a remote result count.

use crate::models::total_pages;

/// Current page plus the last known total result count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    total_results: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            total_results: 0,
        }
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor positioned at `page` (at least 1) with a known total
    pub fn at(page: usize, total_results: usize) -> Self {
        Self {
            page: page.max(1),
            total_results,
        }
    }

    /// One-based current page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_results(&self) -> usize {
        self.total_results
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_results)
    }

    /// Nothing to page through while the total is zero
    pub fn has_prev(&self) -> bool {
        self.total_results > 0 && self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Advance one page. Returns false (and does nothing) on the last page or
    /// when there are no results.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Go back one page. Returns false (and does nothing) on page 1 or when
    /// there are no results.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Back to page 1
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn set_total_results(&mut self, total: usize) {
        self.total_results = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_navigation_without_results() {
        let mut pagination = Pagination::new();
        assert_eq!(pagination.page(), 1);
        assert!(!pagination.next_page());
        assert!(!pagination.prev_page());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_navigation_clamped_to_bounds() {
        let mut pagination = Pagination::new();
        pagination.set_total_results(45);
        assert_eq!(pagination.total_pages(), 3);
        assert!(!pagination.has_prev());
        assert!(pagination.has_next());

        assert!(pagination.next_page());
        assert!(pagination.next_page());
        assert_eq!(pagination.page(), 3);
        assert!(!pagination.has_next());
        assert!(!pagination.next_page());
        assert_eq!(pagination.page(), 3);

        assert!(pagination.prev_page());
        assert!(pagination.prev_page());
        assert!(!pagination.prev_page());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_any_sequence_stays_in_range() {
        let mut pagination = Pagination::new();
        pagination.set_total_results(61);
        let moves = [true, true, true, true, false, true, true, false, false, false, false];
        for forward in moves {
            if forward {
                pagination.next_page();
            } else {
                pagination.prev_page();
            }
            assert!(pagination.page() >= 1);
            assert!(pagination.page() <= pagination.total_pages());
        }
    }

    #[test]
    fn test_no_prev_after_total_drops_to_zero() {
        let mut pagination = Pagination::new();
        pagination.set_total_results(45);
        pagination.next_page();
        pagination.set_total_results(0);

        assert_eq!(pagination.page(), 2);
        assert!(!pagination.has_prev());
        assert!(!pagination.prev_page());
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn test_reset() {
        let mut pagination = Pagination::new();
        pagination.set_total_results(100);
        pagination.next_page();
        pagination.reset();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.total_results(), 100);
    }
}
