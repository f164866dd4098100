// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

// Query-string paging parameters shared by every listing endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    // 1-based page number; anything below 1 is treated as the first page.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        self.page_size()
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

// One page of results plus the counters the frontend paginators need.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PageParams) -> Self {
        let page = params.page();
        let page_size = params.page_size();
        Self {
            items,
            total,
            page,
            page_size,
            has_next_page: page * page_size < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, page_size: Option<i64>) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn defaults_and_clamping() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = params(Some(0), Some(0));
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 1);

        let p = params(Some(-3), Some(10_000));
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_follows_page() {
        let p = params(Some(3), Some(25));
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn has_next_page_is_exact() {
        let p = params(Some(1), Some(20));
        assert!(Page::new(vec![0; 20], 21, &p).has_next_page);
        assert!(!Page::new(vec![0; 20], 20, &p).has_next_page);

        let last = params(Some(2), Some(20));
        assert!(!Page::new(vec![0; 1], 21, &last).has_next_page);
    }
}
