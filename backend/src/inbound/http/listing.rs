//! Paginated list response shape.

use serde::Serialize;

use crate::domain::Page;

/// Body of list endpoints.
///
/// ```json
/// {"data": [...], "total_results": 42, "current_page": 1, "items_per_page": 10}
/// ```
#[derive(Debug, Serialize)]
pub struct PaginateResponse<T> {
    pub data: Vec<T>,
    pub total_results: i64,
    pub current_page: i64,
    pub items_per_page: i64,
}

impl<T> PaginateResponse<T> {
    /// Wrap `page` with the pagination parameters that produced it.
    pub fn new(page: Page<T>, current_page: i64, items_per_page: i64) -> Self {
        Self {
            data: page.items,
            total_results: page.total,
            current_page,
            items_per_page,
        }
    }
}
