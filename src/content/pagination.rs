/// Fixed page size for blog index pages.
pub const POSTS_PER_PAGE: usize = 7;

/// 1-based offset/limit slice over a pre-sorted collection.
/// Out-of-range pages (including page 0) yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = std::cmp::min(start + page_size, items.len());
    &items[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}
