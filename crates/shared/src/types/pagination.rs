//! Page slicing for list endpoints.
//!
//! Ledger movements are computed in full (running balances depend on every
//! earlier line) and then cut into pages, so everything here works on
//! already materialized vectors.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 500;

/// Page size used when the caller gives none.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// A 1-indexed page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl PageRequest {
    /// Builds a request from optional query values, clamping into range.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Index of the first item on this page.
    fn first_index(self) -> usize {
        let skipped = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page);
        usize::try_from(skipped).unwrap_or(usize::MAX)
    }
}

/// One page of items plus where it sits in the whole list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Page position.
    pub meta: PageMeta,
}

/// Position of a page within the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page number, starting at 1.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Items across all pages.
    pub total: u64,
    /// At least 1, even for an empty list.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Cuts the requested page out of a full list.
    #[must_use]
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let per_page = request.per_page.max(1) as usize;
        let total_pages = total.div_ceil(per_page).max(1);
        let data = items
            .into_iter()
            .skip(request.first_index())
            .take(per_page)
            .collect();

        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total: total as u64,
                total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            },
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
