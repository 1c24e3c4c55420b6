//! Domain models

pub mod book;
pub mod borrower;
pub mod borrowing;

use serde::Serialize;
use utoipa::ToSchema;

/// Normalized page parameters for listing queries
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub const DEFAULT_SIZE: i64 = 10;

    /// Normalize raw query parameters (page defaults to 1, pageSize to 10)
    pub fn from_query(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            number: page.unwrap_or(1).max(1),
            size: page_size.unwrap_or(Self::DEFAULT_SIZE).max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }
}

/// Pagination metadata returned alongside every listing
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl Pagination {
    /// totalPages = ceil(totalItems / pageSize)
    pub fn new(page: Page, total_items: i64) -> Self {
        Self {
            current_page: page.number,
            page_size: page.size,
            total_pages: (total_items + page.size - 1) / page.size,
            total_items,
        }
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of records for the current page
    pub items: Vec<T>,
    /// Pagination details
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, page: Page, total_items: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let page = Page::from_query(None, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_offset() {
        let page = Page::from_query(Some(3), Some(25));
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn page_rejects_nonpositive_values() {
        let page = Page::from_query(Some(0), Some(-5));
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        // 12 books at 5 per page span 3 pages
        let pagination = Pagination::new(Page::from_query(Some(2), Some(5)), 12);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_items, 12);
    }

    #[test]
    fn total_pages_of_empty_listing_is_zero() {
        let pagination = Pagination::new(Page::from_query(None, None), 0);
        assert_eq!(pagination.total_pages, 0);
    }
}
