//! Pagination over an ordered collection.

use serde::Serialize;

/// One bounded slice of a collection plus navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slice `items` into the requested page.
///
/// Page numbers are 1-based. Out-of-range requests (including 0) clamp to
/// the nearest valid page, so a listing URL never 404s on its page
/// parameter. An empty collection yields one empty page.
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let number = requested.clamp(1, total_pages);

    let start = (number - 1) * page_size;
    let items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    Page {
        items,
        number,
        total_pages,
        total_items,
        has_next: number < total_pages,
        has_previous: number > 1,
    }
}
