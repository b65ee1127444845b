//! Pure pagination over an already-sorted slice.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Creates a request; a page size of 0 is clamped to 1.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: usize) -> Self {
        Self::new(0, page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of items plus the metadata a paginator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Length of the full sequence.
    pub total: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
}

/// Slices `items` for `request`. Out-of-range pages are empty.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let page_size = request.page_size.max(1);
    let total = items.len();
    let start = request.page_index.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page_index: request.page_index,
        page_size,
        page_count: total.div_ceil(page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::{paginate, PageRequest};

    #[test]
    fn last_page_is_partial() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, PageRequest::new(2, 3));
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.total, 7);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items = vec!['a', 'b'];
        let page = paginate(&items, PageRequest::new(5, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page_size, 1);
        let page = paginate::<u8>(&[], request);
        assert_eq!(page.page_count, 0);
    }
}
