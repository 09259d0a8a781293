//! Page windows over an ordered sequence

/// One page window over a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    /// Zero-based inclusive start of the window
    pub start_index: usize,
    /// Zero-based exclusive end of the window
    pub end_index: usize,
    pub current_page: usize,
}

/// Tracks the current page of a single view.
///
/// The page resets to 1 whenever the length of the paginated sequence
/// changes between calls, so a shrinking filter result never leaves the
/// view pointing past its end.
#[derive(Debug, Clone)]
pub struct Paginator {
    items_per_page: usize,
    current_page: usize,
    previous_len: Option<usize>,
}

impl Paginator {
    /// `items_per_page` of zero is treated as one
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            current_page: 1,
            previous_len: None,
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Jump to `page`. Out-of-range pages are not clamped.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Cut the window for the current page out of `items`
    pub fn paginate<T: Clone>(&mut self, items: &[T]) -> Page<T> {
        match self.previous_len {
            Some(len) if len != items.len() => {
                self.current_page = 1;
                self.previous_len = Some(items.len());
            }
            None => self.previous_len = Some(items.len()),
            _ => {}
        }

        if items.is_empty() {
            return Page {
                items: Vec::new(),
                total_pages: 0,
                start_index: 0,
                end_index: 0,
                current_page: self.current_page,
            };
        }

        let total_pages = items.len().div_ceil(self.items_per_page);
        // Saturate so absurd page numbers still land past the end
        let start_index = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page);
        let end_index = start_index
            .saturating_add(self.items_per_page)
            .min(items.len());
        let page_items = items
            .get(start_index..end_index)
            .map(<[T]>::to_vec)
            .unwrap_or_default();

        Page {
            items: page_items,
            total_pages,
            start_index,
            end_index,
            current_page: self.current_page,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ITEMS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let mut paginator = Paginator::new(10);
        let page = paginator.paginate::<u32>(&[]);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.start_index, 0);
        assert_eq!(page.end_index, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_window_invariant() {
        for len in 1..=35usize {
            let items: Vec<usize> = (0..len).collect();
            for per_page in [1usize, 3, 10] {
                let mut paginator = Paginator::new(per_page);
                paginator.paginate(&items);
                let total_pages = len.div_ceil(per_page);
                for page_no in 1..=total_pages {
                    paginator.set_current_page(page_no);
                    let page = paginator.paginate(&items);
                    assert_eq!(page.total_pages, total_pages);
                    assert_eq!(page.items.len(), per_page.min(len - page.start_index));
                    assert!(page.start_index < page.end_index);
                    assert!(page.end_index <= len);
                    assert_eq!(page.items, items[page.start_index..page.end_index].to_vec());
                }
            }
        }
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<u32> = (0..25).collect();
        let mut paginator = Paginator::new(10);
        paginator.paginate(&items);
        paginator.set_current_page(3);

        let page = paginator.paginate(&items);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.start_index, 20);
        assert_eq!(page.end_index, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_length_change_resets_page() {
        let long: Vec<u32> = (0..50).collect();
        let short: Vec<u32> = (0..12).collect();
        let mut paginator = Paginator::new(10);

        paginator.paginate(&long);
        paginator.set_current_page(4);
        assert_eq!(paginator.paginate(&long).current_page, 4);

        let page = paginator.paginate(&short);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items, (0..10).collect::<Vec<_>>());

        // Growing again also resets
        paginator.set_current_page(2);
        assert_eq!(paginator.paginate(&long).current_page, 1);
    }

    #[test]
    fn test_same_length_keeps_page() {
        let first: Vec<u32> = (0..30).collect();
        let reordered: Vec<u32> = (0..30).rev().collect();
        let mut paginator = Paginator::new(10);

        paginator.paginate(&first);
        paginator.set_current_page(2);
        let page = paginator.paginate(&reordered);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items[0], 19);
    }

    #[test]
    fn test_first_call_honors_requested_page() {
        let items: Vec<u32> = (0..30).collect();
        let mut paginator = Paginator::new(10);
        paginator.set_current_page(3);
        assert_eq!(paginator.paginate(&items).start_index, 20);
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_clamped() {
        let items: Vec<u32> = (0..5).collect();
        let mut paginator = Paginator::new(10);
        paginator.paginate(&items);
        paginator.set_current_page(9);

        let page = paginator.paginate(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 9);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let items: Vec<u32> = (0..30).collect();
        let mut paginator = Paginator::new(10);
        paginator.set_current_page(usize::MAX);

        let page = paginator.paginate(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, usize::MAX);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.end_index, 30);
    }
}
