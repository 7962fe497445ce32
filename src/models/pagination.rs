//! Page requests and paginated responses

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?page=` query parameter.
///
/// Kept as a raw string so that malformed values fall back to the first page
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page_number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn with_size(&self, per_page: i64) -> PageRequest {
        PageRequest::new(self.page_number(), per_page)
    }
}

/// Validated page window
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

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Entries of the requested page, empty past the last page
    pub items: Vec<T>,
    /// Total number of entries
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Entries per page
    pub per_page: i64,
    /// Number of non-empty pages
    pub num_pages: i64,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let num_pages = if total <= 0 {
            // an empty listing still renders one (empty) page
            1
        } else {
            (total + request.per_page - 1) / request.per_page
        };
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            num_pages,
        }
    }
}
