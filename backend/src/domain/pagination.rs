//! Page window arithmetic and the paginated result shape.

/// One page of results plus the number of rows matching the filter before
/// `LIMIT`/`OFFSET` were applied.
///
/// `total` comes from a window count over the returned rows, so a page past
/// the end reports `0` even when earlier pages have rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// `LIMIT`/`OFFSET` derived from a one-based page number.
///
/// Returns `None` when `limit <= 0`, meaning no window is applied. Pages
/// below one are treated as the first page.
///
/// # Examples
/// ```
/// use registry::domain::page_window;
///
/// assert_eq!(page_window(1, 10), Some((10, 0)));
/// assert_eq!(page_window(3, 10), Some((10, 20)));
/// assert_eq!(page_window(0, 10), Some((10, 0)));
/// assert_eq!(page_window(2, 0), None);
/// ```
pub fn page_window(page: i64, limit: i64) -> Option<(i64, i64)> {
    if limit <= 0 {
        return None;
    }
    let page = page.max(1);
    Some((limit, (page - 1).saturating_mul(limit)))
}
