//! Fixed-size pagination and the page-number window
//!
//! `paginate` does not clamp: page 0 or a page past the end gives an empty
//! slice. Callers that take a page from user input clamp it first with
//! [`clamp_page`].

use serde::{Deserialize, Serialize};

use crate::constants::PAGE_WINDOW_RADIUS;

/// One page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page
    pub items: &'a [T],
    /// Requested page (1-based), as given
    pub page: u64,
    /// `ceil(total_items / items_per_page)`, 0 for an empty list
    pub total_pages: u64,
    /// Index of the first item of this page in the full list
    pub start_index: usize,
    /// One past the last item of this page, capped at the list length
    pub end_index: usize,
    /// Length of the full list
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// 1-based number of the first item, for "showing X to Y of Z"
    pub fn first_item_number(&self) -> usize {
        self.start_index + 1
    }

    /// 1-based number of the last item
    pub fn last_item_number(&self) -> usize {
        self.end_index
    }
}

/// A slot in the page-number control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageToken {
    Page(u64),
    /// Display-only gap marker
    Ellipsis,
}

/// `ceil(total_items / items_per_page)`; 0 when the list is empty or the
/// page size is 0
pub fn total_pages(total_items: usize, items_per_page: usize) -> u64 {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page) as u64
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`
pub fn clamp_page(page: u64, total_pages: u64) -> u64 {
    page.clamp(1, total_pages.max(1))
}

/// Slice `entries` into page `page` (1-based) of `items_per_page` items
pub fn paginate<T>(entries: &[T], items_per_page: usize, page: u64) -> Page<'_, T> {
    let total_items = entries.len();
    let total_pages = total_pages(total_items, items_per_page);

    let start_index = (page.saturating_sub(1) as usize)
        .saturating_mul(items_per_page)
        .min(total_items);
    let end_index = if page == 0 {
        start_index
    } else {
        start_index.saturating_add(items_per_page).min(total_items)
    };

    Page {
        items: &entries[start_index..end_index],
        page,
        total_pages,
        start_index: (page.saturating_sub(1) as usize).saturating_mul(items_per_page),
        end_index,
        total_items,
    }
}

/// Page numbers to show around `current`, with ellipses for gaps
///
/// Page 1 and the last page are always present (the last only when there
/// is more than one page), plus every page within two of `current`.
pub fn visible_pages(current: u64, total_pages: u64) -> Vec<PageToken> {
    let radius = PAGE_WINDOW_RADIUS as i64;
    let current = current as i64;
    let total = total_pages as i64;

    let mut tokens = vec![PageToken::Page(1)];

    if current - radius > 2 {
        tokens.push(PageToken::Ellipsis);
    }

    let low = (current - radius).max(2);
    let high = (current + radius).min(total - 1);
    tokens.extend((low..=high).map(|i| PageToken::Page(i as u64)));

    if current + radius < total - 1 {
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total_pages));
    } else if total > 1 {
        tokens.push(PageToken::Page(total_pages));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageToken::{Ellipsis, Page as P};

    #[test]
    fn test_pages_cover_every_entry_once() {
        for len in [0usize, 1, 19, 20, 21, 57, 200] {
            for per_page in [1usize, 7, 20] {
                let entries: Vec<usize> = (0..len).collect();
                let pages = total_pages(len, per_page);
                let collected: Vec<usize> = (1..=pages)
                    .flat_map(|p| paginate(&entries, per_page, p).items.to_vec())
                    .collect();
                assert_eq!(collected, entries, "len={} per_page={}", len, per_page);
            }
        }
    }

    #[test]
    fn test_second_page_of_25() {
        let entries: Vec<u32> = (0..25).collect();
        let page = paginate(&entries, 20, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.start_index, 20);
        assert_eq!(page.end_index, 25);
        assert_eq!(page.first_item_number(), 21);
        assert!(!page.has_next_page());
        assert!(page.has_previous_page());
    }

    #[test]
    fn test_empty_list_has_zero_pages() {
        let entries: Vec<u32> = Vec::new();
        assert_eq!(total_pages(0, 20), 0);
        for p in 0..3 {
            let page = paginate(&entries, 20, p);
            assert_eq!(page.total_pages, 0);
            assert!(page.items.is_empty());
        }
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_clamped() {
        let entries: Vec<u32> = (0..30).collect();
        assert!(paginate(&entries, 20, 3).items.is_empty());
        assert!(paginate(&entries, 20, 99).items.is_empty());
        assert!(paginate(&entries, 20, 0).items.is_empty());
        assert!(paginate(&entries, 0, 1).items.is_empty());
    }

    #[test]
    fn test_paginate_is_pure() {
        let entries: Vec<u32> = (0..45).collect();
        assert_eq!(paginate(&entries, 20, 2), paginate(&entries, 20, 2));
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(
            visible_pages(10, 50),
            vec![P(1), Ellipsis, P(8), P(9), P(10), P(11), P(12), Ellipsis, P(50)]
        );
    }

    #[test]
    fn test_window_edges() {
        assert_eq!(visible_pages(1, 50), vec![P(1), P(2), P(3), Ellipsis, P(50)]);
        assert_eq!(visible_pages(4, 50), vec![P(1), P(2), P(3), P(4), P(5), P(6), Ellipsis, P(50)]);
        assert_eq!(visible_pages(5, 50), vec![P(1), Ellipsis, P(3), P(4), P(5), P(6), P(7), Ellipsis, P(50)]);
        assert_eq!(visible_pages(50, 50), vec![P(1), Ellipsis, P(48), P(49), P(50)]);
        assert_eq!(visible_pages(47, 50), vec![P(1), Ellipsis, P(45), P(46), P(47), P(48), P(49), P(50)]);
    }

    #[test]
    fn test_window_small_totals() {
        assert_eq!(visible_pages(1, 0), vec![P(1)]);
        assert_eq!(visible_pages(1, 1), vec![P(1)]);
        assert_eq!(visible_pages(1, 2), vec![P(1), P(2)]);
        assert_eq!(visible_pages(2, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
    }

    #[test]
    fn test_token_serialization() {
        let json = serde_json::to_string(&vec![P(1), Ellipsis]).unwrap();
        assert_eq!(json, r#"[{"page":1},"ellipsis"]"#);
    }
}
