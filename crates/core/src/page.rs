//! Pagination primitives shared by every listing operation.

/// Limit/offset pair, as supplied by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of records to return.
    pub limit: u32,
    /// Number of records to skip (0-based).
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(10),
            offset: offset.unwrap_or(0),
        }
    }
}

/// One page of results plus the total match count across all pages.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: Page,
}
