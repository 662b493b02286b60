/// Pagination support for list responses
///
/// Standard pagination model used across all bounded contexts. The shape
/// mirrors the page envelopes the upstream list APIs return, so adapters can
/// pass provider paging straight through.
use serde::{Deserialize, Serialize};

/// Item counters inside a pagination block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Pagination block attached to every paginated response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub has_next_page: bool,
    pub last_visible_page: u32,
    pub items: PaginationItems,
}

impl Pagination {
    /// Build pagination for a locally paged collection of `total` items.
    ///
    /// `count` is the number of items actually returned on `page`.
    pub fn for_page(page: u32, per_page: u32, total: usize, count: usize) -> Self {
        let total = total as u32;
        let last_visible_page = if per_page == 0 {
            0
        } else {
            ((total as f64) / (per_page as f64)).ceil() as u32
        };

        Self {
            page,
            has_next_page: (total as u64) > (page as u64) * (per_page as u64),
            last_visible_page,
            items: PaginationItems {
                count: count as u32,
                total,
                per_page,
            },
        }
    }
}

/// Slice one page (1-based) out of an ordered collection
pub fn page_slice<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let page = page.max(1) as usize;
    let per_page = per_page as usize;
    let start = (page - 1).saturating_mul(per_page);

    if start >= items.len() {
        return Vec::new();
    }

    let end = (start + per_page).min(items.len());
    items[start..end].to_vec()
}
