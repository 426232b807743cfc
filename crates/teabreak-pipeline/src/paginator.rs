//! Paginator: slices a list into pages and computes navigation windows.

use serde::Serialize;

use teabreak_core::defaults::{PAGE_SIZE, PAGE_WINDOW};

/// Number of pages needed for `total_items`. Never less than one.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

// =============================================================================
// PAGE
// =============================================================================

/// One page of an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// One-based position of the first item on this page, 0 when empty.
    pub fn first_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }

    /// One-based position of the last item on this page, 0 when empty.
    pub fn last_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item() + self.items.len() - 1
        }
    }

    /// Navigation window around this page.
    pub fn window(&self) -> PageWindow {
        page_window(self.total_pages, self.page_number)
    }
}

/// Slice `records` into the page `page_number` of size `page_size`.
///
/// Both inputs are raised to at least 1. A page past the end yields empty
/// items rather than an error.
pub fn paginate<T: Clone>(records: &[T], page_number: usize, page_size: usize) -> Page<T> {
    let page_number = page_number.max(1);
    let page_size = page_size.max(1);
    let total_items = records.len();

    let start = (page_number - 1).saturating_mul(page_size);
    let items = if start >= total_items {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(total_items);
        records[start..end].to_vec()
    };

    Page {
        items,
        page_number,
        page_size,
        total_items,
        total_pages: total_pages(total_items, page_size),
    }
}

// =============================================================================
// PAGE REQUEST
// =============================================================================

/// Requested page coordinates, as held by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 1,
            size: PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// Clamp into `[1, total_pages]` for the given item count.
    pub fn clamp_to(self, total_items: usize) -> Self {
        let size = self.size.max(1);
        let last = total_pages(total_items, size);
        Self {
            number: self.number.clamp(1, last),
            size,
        }
    }
}

// =============================================================================
// PAGE WINDOW
// =============================================================================

/// Page numbers to render as navigation buttons plus the surrounding controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    /// A jump-to-first button is shown before the window.
    pub show_first: bool,
    /// Pages are skipped between the first button and the window.
    pub leading_ellipsis: bool,
    /// Pages are skipped between the window and the last button.
    pub trailing_ellipsis: bool,
    /// A jump-to-last button is shown after the window.
    pub show_last: bool,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Window of at most [`PAGE_WINDOW`] pages around `current`.
pub fn page_window(total_pages: usize, current: usize) -> PageWindow {
    page_window_with(total_pages, current, PAGE_WINDOW)
}

/// Window of at most `width` consecutive pages, centred on `current` where
/// possible and shifted inward near either end.
pub fn page_window_with(total_pages: usize, current: usize, width: usize) -> PageWindow {
    let total = total_pages.max(1);
    let width = width.max(1);
    let current = current.clamp(1, total);

    let half = width / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = start.saturating_add(width - 1).min(total);
    if end - start + 1 < width {
        start = (end + 1).saturating_sub(width).max(1);
    }

    PageWindow {
        pages: (start..=end).collect(),
        current,
        show_first: start > 1,
        leading_ellipsis: start > 2,
        trailing_ellipsis: end + 1 < total,
        show_last: end < total,
        has_previous: current > 1,
        has_next: current < total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_paginate_slices() {
        let page = paginate(&numbers(25), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.first_item(), 21);
        assert_eq!(page.last_item(), 25);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate::<usize>(&[], 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.first_item(), 0);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let records = numbers(30);
        let page = paginate(&records, total_pages(30, 10) + 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page_number, 8);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_raises_zero_inputs() {
        let page = paginate(&numbers(3), 0, 0);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec![1]);
    }

    #[test]
    fn test_paginate_coverage() {
        for size in [1, 3, 7, 10, 40] {
            let records = numbers(37);
            let pages = total_pages(records.len(), size);
            let rebuilt: Vec<usize> = (1..=pages)
                .flat_map(|p| paginate(&records, p, size).items)
                .collect();
            assert_eq!(rebuilt, records, "page size {}", size);
        }
    }

    #[test]
    fn test_page_request_clamp() {
        assert_eq!(PageRequest::new(9, 10).clamp_to(25), PageRequest::new(3, 10));
        assert_eq!(PageRequest::new(0, 0).clamp_to(5), PageRequest::new(1, 1));
        assert_eq!(PageRequest::new(4, 10).clamp_to(0), PageRequest::new(1, 10));
        assert_eq!(PageRequest::default(), PageRequest::new(1, PAGE_SIZE));
    }

    #[test]
    fn test_page_window_start() {
        let window = page_window(20, 1);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(!window.leading_ellipsis);
        assert!(window.trailing_ellipsis);
        assert!(window.show_last);
        assert!(!window.has_previous);
    }

    #[test]
    fn test_page_window_end() {
        let window = page_window(20, 20);
        assert_eq!(window.pages, vec![16, 17, 18, 19, 20]);
        assert!(window.show_first);
        assert!(window.leading_ellipsis);
        assert!(!window.show_last);
        assert!(!window.has_next);
    }

    #[test]
    fn test_page_window_middle() {
        let window = page_window(20, 10);
        assert_eq!(window.pages, vec![8, 9, 10, 11, 12]);
        assert_eq!(window.current, 10);
    }

    #[test]
    fn test_page_window_near_edges() {
        assert_eq!(page_window(20, 2).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(20, 19).pages, vec![16, 17, 18, 19, 20]);

        let window = page_window(20, 4);
        assert_eq!(window.pages, vec![2, 3, 4, 5, 6]);
        assert!(window.show_first);
        assert!(!window.leading_ellipsis);
    }

    #[test]
    fn test_page_window_fewer_pages_than_width() {
        let window = page_window(3, 3);
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(!window.show_first);
        assert!(!window.show_last);
        assert_eq!(page_window(1, 1).pages, vec![1]);
    }

    #[test]
    fn test_page_window_last_button_without_ellipsis() {
        let window = page_window(6, 1);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(window.show_last);
        assert!(!window.trailing_ellipsis);
    }

    #[test]
    fn test_page_window_huge_width_shows_all_pages() {
        let window = page_window_with(4, 2, usize::MAX);
        assert_eq!(window.pages, vec![1, 2, 3, 4]);
        assert!(!window.show_first);
        assert!(!window.show_last);
    }

    #[test]
    fn test_page_window_clamps_current() {
        let window = page_window(4, 9);
        assert_eq!(window.current, 4);
        assert_eq!(window.pages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_page_window_never_duplicates_or_overflows() {
        for total in 1..=12 {
            for current in 1..=total {
                let window = page_window(total, current);
                assert!(window.pages.len() <= PAGE_WINDOW);
                assert!(window.pages.contains(&current));
                assert!(window.pages.windows(2).all(|w| w[1] == w[0] + 1));
                assert!(window.pages.iter().all(|&p| p >= 1 && p <= total));
            }
        }
    }
}
