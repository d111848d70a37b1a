//! Page number strip for the pagination control

/// Up to this many pages are listed without gaps
const MAX_PLAIN_PAGES: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

/// Buttons to show for `page` out of `total_pages`.
///
/// Short ranges list every page. Longer ones keep the first and last page
/// plus the neighbours of the current page, with gaps in between. Nothing is
/// shown for a single page.
pub fn page_items(page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= MAX_PLAIN_PAGES {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let page = page.clamp(1, total_pages);
    let mut items = vec![PageItem::Page(1)];
    if page > 3 {
        items.push(PageItem::Gap);
    }
    let start = page.saturating_sub(1).max(2);
    let end = (page + 1).min(total_pages - 1);
    items.extend((start..=end).map(PageItem::Page));
    if page + 2 < total_pages {
        items.push(PageItem::Gap);
    }
    items.push(PageItem::Page(total_pages));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Gap, Page};

    #[test]
    fn test_single_page_shows_nothing() {
        assert!(page_items(1, 0).is_empty());
        assert!(page_items(1, 1).is_empty());
    }

    #[test]
    fn test_short_range_lists_every_page() {
        assert_eq!(page_items(2, 4), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert_eq!(page_items(1, 7).len(), 7);
    }

    #[test]
    fn test_long_range_has_gaps() {
        assert_eq!(page_items(1, 20), vec![Page(1), Page(2), Gap, Page(20)]);
        assert_eq!(page_items(10, 20), vec![Page(1), Gap, Page(9), Page(10), Page(11), Gap, Page(20)]);
        assert_eq!(page_items(20, 20), vec![Page(1), Gap, Page(19), Page(20)]);
    }

    #[test]
    fn test_no_gap_next_to_neighbours() {
        assert_eq!(page_items(3, 10), vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(10)]);
        assert_eq!(page_items(8, 10), vec![Page(1), Gap, Page(7), Page(8), Page(9), Page(10)]);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        assert_eq!(page_items(99, 10), vec![Page(1), Gap, Page(9), Page(10)]);
    }
}
