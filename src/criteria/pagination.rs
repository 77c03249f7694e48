//! Page requests and page responses
//!
//! A page request resolves to a concrete limit/offset window using the
//! configured defaults; the execution port answers with a [`Page`].

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Raw page request as received from a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl PaginationQuery {
    pub fn new(limit: Option<u32>, page: Option<u32>) -> Self {
        Self { limit, page }
    }

    /// Applies defaults and clamps the limit into `[1, max_limit]`
    pub fn resolve(&self, config: &PaginationConfig) -> Pagination {
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        Pagination {
            limit,
            page: self.page.unwrap_or(0),
        }
    }
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub page: u32,
}

impl Pagination {
    /// Number of rows skipped before this page
    pub fn offset(&self) -> u32 {
        self.page.saturating_mul(self.limit)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pagination: Pagination, total_elements: u64) -> Self {
        let size = u64::from(pagination.limit.max(1));
        let total_pages = total_elements.div_ceil(size);
        Self {
            content,
            page_number: pagination.page,
            page_size: pagination.limit,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_elements,
        }
    }

    /// Maps the page content, keeping the totals
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }

    /// Maps the page content with a fallible function, keeping the totals.
    /// The first error aborts the mapping.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, E>>()?,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
