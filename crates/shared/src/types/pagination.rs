//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum page size accepted from clients.
const MAX_LIMIT: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page (capped at 100).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.clamped_limit())
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn db_limit(&self) -> u64 {
        u64::from(self.clamped_limit())
    }

    /// Returns the effective page size after clamping.
    #[must_use]
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.clamp(1, MAX_LIMIT);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(limit))
        };

        Self {
            data,
            meta: PageMeta {
                page,
                limit,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 20);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_offset_calculation() {
        let req = PageRequest { page: 3, limit: 20 };
        assert_eq!(req.offset(), 40);
        assert_eq!(req.db_limit(), 20);
    }

    #[test]
    fn test_limit_clamped() {
        let req = PageRequest {
            page: 1,
            limit: 5000,
        };
        assert_eq!(req.db_limit(), 100);

        let req = PageRequest { page: 1, limit: 0 };
        assert_eq!(req.db_limit(), 1);
    }

    #[test]
    fn test_page_response_total_pages() {
        let resp = PageResponse::new(vec![1, 2, 3], 1, 20, 41);
        assert_eq!(resp.meta.total_pages, 3);

        let empty: PageResponse<i32> = PageResponse::new(vec![], 1, 20, 0);
        assert_eq!(empty.meta.total_pages, 1);
    }
}
