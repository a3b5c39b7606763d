//! Async store traits the services are written against.

use async_trait::async_trait;

use storefront_core::{
    NewOrder, NewProduct, Order, OrderId, Page, Paged, Product, ProductFilter, ProductId,
};

use crate::error::StoreResult;

/// Outcome of the conditional-decrement primitive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Decrement applied; carries the post-decrement quantity.
    Reserved(i64),
    /// The product exists but its current quantity is below the requested amount.
    Insufficient,
    /// The product id does not resolve to a document.
    NotFound,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<ProductId>;

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// List products matching `filter`, sorted by ascending identifier.
    async fn list_products(&self, filter: &ProductFilter, page: Page) -> StoreResult<Paged<Product>>;

    /// Atomic check-and-decrement: "decrement quantity by `amount` where
    /// quantity >= `amount`", as a single filtered update. Never a
    /// read-then-write pair; on failure the stored quantity is unchanged.
    async fn try_reserve(&self, id: ProductId, amount: i64) -> StoreResult<ReserveOutcome>;

    /// Unconditional re-increment. Only the compensation path uses this.
    async fn release(&self, id: ProductId, amount: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId>;

    /// List a user's orders, sorted by ascending identifier.
    async fn list_orders(&self, user_id: &str, page: Page) -> StoreResult<Paged<Order>>;
}

/// Connectivity probe for the health endpoint.
#[async_trait]
pub trait Health: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}
