//! `storefront-catalog` — peripheral query service.
//!
//! Thin create/list wrapper over the store traits; no business rules beyond
//! filter construction live here.

pub mod service;

pub use service::CatalogService;
