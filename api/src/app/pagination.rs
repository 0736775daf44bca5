//! Page request clamping shared by every listing use case

use serde::Serialize;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A clamped page request: `page >= 1`, `1 <= limit <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamp raw caller input. A page below 1 becomes 1, a limit below 1
    /// becomes the default and a limit above 100 becomes 100.
    pub fn clamped(page: i64, limit: i64) -> Self {
        let page = if page < 1 { 1 } else { page as u64 };
        let limit = if limit < 1 {
            DEFAULT_LIMIT
        } else {
            (limit as u64).min(MAX_LIMIT)
        };
        Self { page, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results with the clamped request that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_and_limit() {
        assert_eq!(PageRequest::clamped(0, 0), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::clamped(-5, -1), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::clamped(3, 500), PageRequest { page: 3, limit: 100 });
        assert_eq!(PageRequest::clamped(2, 25), PageRequest { page: 2, limit: 25 });
        assert_eq!(PageRequest::clamped(1, 100), PageRequest { page: 1, limit: 100 });
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::<()>::new(vec![], PageRequest::clamped(1, 10), 21);
        assert_eq!(page.total_pages(), 3);

        let page = Page::<()>::new(vec![], PageRequest::clamped(1, 10), 20);
        assert_eq!(page.total_pages(), 2);

        let page = Page::<()>::new(vec![], PageRequest::clamped(1, 10), 0);
        assert_eq!(page.total_pages(), 0);
    }
}
