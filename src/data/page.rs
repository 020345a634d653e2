// ---------------------------------------------------------------------------
// Pagination over the filtered view
// ---------------------------------------------------------------------------

/// One page of a view: the items on it plus the total page count.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

/// Number of pages needed for `len` items; zero for an empty view.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slice page `page_index` (1-based) out of `view`.
///
/// An index outside `[1, total_pages]` yields an empty slice rather than a
/// panic: the view may shrink under a previously selected page.
pub fn page<T>(view: &[T], page_size: usize, page_index: usize) -> Page<'_, T> {
    let total_pages = total_pages(view.len(), page_size);
    let items = if page_index == 0 || page_index > total_pages {
        &view[..0]
    } else {
        let start = (page_index - 1) * page_size;
        let end = (start + page_size).min(view.len());
        &view[start..end]
    };
    Page { items, total_pages }
}

/// Clamp a requested page into `[1, total_pages]`; 1 when there are no pages.
pub fn clamp_page_index(page_index: usize, total_pages: usize) -> usize {
    page_index.clamp(1, total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_in_pages_of_twelve() {
        let view: Vec<u32> = (0..25).collect();
        assert_eq!(page(&view, 12, 1).items.len(), 12);
        assert_eq!(page(&view, 12, 2).items.len(), 12);
        let last = page(&view, 12, 3);
        assert_eq!(last.items, &[24]);
        assert_eq!(last.total_pages, 3);
    }

    #[test]
    fn empty_view_has_no_pages() {
        let view: Vec<u32> = Vec::new();
        let p = page(&view, 12, 1);
        assert!(p.items.is_empty());
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn out_of_range_index_is_empty_not_a_panic() {
        let view: Vec<u32> = (0..15).collect();
        assert!(page(&view, 12, 5).items.is_empty());
        assert!(page(&view, 12, 0).items.is_empty());
        assert!(page(&view, 0, 1).items.is_empty());
        assert!(page(&view, 12, usize::MAX).items.is_empty());
    }

    #[test]
    fn pages_partition_the_view() {
        for len in [0usize, 1, 11, 12, 13, 24, 25, 100] {
            for size in [1usize, 5, 12] {
                let view: Vec<usize> = (0..len).collect();
                let total = total_pages(len, size);
                let mut seen = Vec::new();
                for i in 1..=total {
                    let items = page(&view, size, i).items;
                    assert!(items.len() <= size);
                    seen.extend_from_slice(items);
                }
                assert_eq!(seen, view, "len {len}, size {size}");
            }
        }
    }

    #[test]
    fn clamp_keeps_index_in_range() {
        assert_eq!(clamp_page_index(5, 2), 2);
        assert_eq!(clamp_page_index(0, 3), 1);
        assert_eq!(clamp_page_index(2, 3), 2);
        assert_eq!(clamp_page_index(4, 0), 1);
    }
}
