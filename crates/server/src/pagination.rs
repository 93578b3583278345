//! Shared pagination query parameters and response envelope.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// `?page=N&limit=M` query parameters, both optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// 1-based page number, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to `1..=100`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// SQL OFFSET for the current page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata returned alongside every paginated listing.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    /// `total_pages` is `ceil(total / limit)`; zero rows means zero pages.
    #[must_use]
    pub fn new(query: &PageQuery, total: i64) -> Self {
        let limit = query.limit();
        Self {
            page: query.page(),
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// Paginated response envelope: `{"data": [...], "pagination": {...}}`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, query: &PageQuery, total: i64) -> Self {
        Self {
            data,
            pagination: PageInfo::new(query, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, limit: i64) -> PageQuery {
        PageQuery {
            page: Some(page),
            limit: Some(limit),
        }
    }

    #[test]
    fn defaults_apply_when_params_missing() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(query(1, 0).limit(), 1);
        assert_eq!(query(1, 10_000).limit(), MAX_LIMIT);
    }

    #[test]
    fn page_below_one_is_clamped() {
        assert_eq!(query(-3, 10).page(), 1);
        assert_eq!(query(-3, 10).offset(), 0);
    }

    #[test]
    fn offset_uses_page_and_limit() {
        assert_eq!(query(3, 25).offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageInfo::new(&query(1, 10), 0).total_pages, 0);
        assert_eq!(PageInfo::new(&query(1, 10), 1).total_pages, 1);
        assert_eq!(PageInfo::new(&query(1, 10), 10).total_pages, 1);
        assert_eq!(PageInfo::new(&query(1, 10), 11).total_pages, 2);
        assert_eq!(PageInfo::new(&query(1, 10), 95).total_pages, 10);
    }
}
