//! `storefront-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** types (no storage, no HTTP, no IO):
//! strongly-typed identifiers, the product and order models, catalog filter
//! semantics, and pagination primitives.

pub mod error;
pub mod id;
pub mod order;
pub mod page;
pub mod product;

pub use error::InvalidIdError;
pub use id::{OrderId, ProductId};
pub use order::{NewOrder, Order, OrderItem};
pub use page::{Page, Paged};
pub use product::{NewProduct, Product, ProductFilter};
