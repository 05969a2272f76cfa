//! Clamped pagination over an ordered result set
//!
//! Out-of-range page numbers are a normal artifact of concurrent filter
//! changes (a user on page 9 narrows the filter to 2 pages), so the slicer
//! clamps instead of erroring. The same clamp/offset arithmetic drives both
//! the in-memory organism listing and the SQL `LIMIT`/`OFFSET` paging in the
//! protein repository, so the two layers always agree.

use serde::Serialize;

/// One page of a filtered, ordered result set plus navigation metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> ResultPage<T> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total_count: 0,
            total_pages: 1,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        (self.page + 1).min(self.total_pages)
    }
}

/// Total pages for a result set; an empty set still has one (empty) page
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_count.div_ceil(page_size).max(1)
}

/// Clamp a requested page number into `[1, total_pages]`
pub fn clamp_page(requested: usize, total_count: usize, page_size: usize) -> usize {
    requested.clamp(1, total_pages(total_count, page_size))
}

/// Zero-based offset of the first item on `page`
pub fn offset(page: usize, page_size: usize) -> usize {
    (page.max(1) - 1) * page_size.max(1)
}

/// Return the requested slice of `results` with navigation metadata. Totals
/// are computed from the filtered set handed in, not the full table.
pub fn slice<T: Clone>(results: &[T], page_size: usize, page_number: usize) -> ResultPage<T> {
    let page_size = page_size.max(1);
    let total_count = results.len();
    let page = clamp_page(page_number, total_count, page_size);
    let start = offset(page, page_size).min(total_count);
    let end = (start + page_size).min(total_count);

    ResultPage {
        items: results[start..end].to_vec(),
        page,
        page_size,
        total_count,
        total_pages: total_pages(total_count, page_size),
    }
}
