//! Route handlers and their request/response DTOs.

pub mod health;
pub mod orders;
pub mod products;

use serde::Serialize;

use storefront_core::{Page, Paged};

/// Standard listing envelope: one page of data plus the pagination echo.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> ListResponse<T> {
    pub fn new<U>(paged: Paged<U>, map: impl Fn(U) -> T) -> Self {
        let Paged { data, total, page } = paged;
        Self {
            data: data.into_iter().map(map).collect(),
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Normalize an optional query string: absent and empty both mean "no filter".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn page_from(limit: Option<u32>, offset: Option<u32>) -> Page {
    Page::new(limit, offset)
}
