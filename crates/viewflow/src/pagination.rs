//! Pagination Window
//!
//! Derivation of the fixed-width page-button window shown under a
//! paginated table.

/// Number of page buttons shown at once.
pub const PAGE_WINDOW: usize = 3;

/// 0-based page buttons to display: a [`PAGE_WINDOW`]-wide window
/// centered as closely as possible on `page_index`, clamped so it never
/// runs past `[0, total_pages)`.
pub fn page_window(page_index: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let width = PAGE_WINDOW.min(total_pages);
    let start = page_index
        .saturating_sub(PAGE_WINDOW / 2)
        .min(total_pages - width);
    (start..start + width).collect()
}

/// Whether a "previous" control is enabled.
pub fn has_prev(page_index: usize) -> bool {
    page_index > 0
}

/// Whether a "next" control is enabled.
pub fn has_next(page_index: usize, total_pages: usize) -> bool {
    page_index + 1 < total_pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_at_end() {
        assert_eq!(page_window(4, 5), vec![2, 3, 4]);
    }

    #[test]
    fn test_window_clamps_at_start() {
        assert_eq!(page_window(0, 5), vec![0, 1, 2]);
        assert_eq!(page_window(1, 5), vec![0, 1, 2]);
    }

    #[test]
    fn test_window_centers_in_the_middle() {
        assert_eq!(page_window(2, 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_shrinks_for_few_pages() {
        assert_eq!(page_window(0, 1), vec![0]);
        assert_eq!(page_window(1, 2), vec![0, 1]);
        assert_eq!(page_window(0, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_boundary_controls() {
        assert!(!has_prev(0));
        assert!(has_prev(1));
        assert!(has_next(3, 5));
        assert!(!has_next(4, 5));
        assert!(!has_next(0, 0));
    }
}
