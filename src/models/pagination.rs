//! Page-based slicing of ordered result sets

/// A normalized page request: `page` is 1-based and never below 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Build from the raw `?page=` value. Missing, non-numeric or
    /// non-positive values select the first page.
    pub fn parse(raw: Option<&str>, per_page: i64) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_pages(total_items, request.per_page),
            current_page: request.page,
        }
    }
}

/// `ceil(total / per_page)`, zero for an empty set
pub fn total_pages(total_items: i64, per_page: i64) -> i64 {
    if total_items <= 0 {
        return 0;
    }
    let per_page = per_page.max(1);
    (total_items + per_page - 1) / per_page
}
