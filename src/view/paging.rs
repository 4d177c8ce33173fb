use std::ops::Range;

/// Number of pages needed for `len` items. Zero when empty.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Index of the last valid page, or 0 when there are no items.
pub fn last_page(len: usize, page_size: usize) -> usize {
    page_count(len, page_size).saturating_sub(1)
}

/// Clamp a requested page into the valid range.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.min(last_page(len, page_size))
}

/// Positions in the sorted sequence covered by `page`.
/// Empty if the page is past the end.
pub fn page_bounds(page: usize, len: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}
