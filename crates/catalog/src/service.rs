//! Read-side service: product creation and the listing endpoints.

use std::sync::Arc;

use storefront_core::{
    NewProduct, Order, Page, Paged, Product, ProductFilter, ProductId,
};
use storefront_store::{OrderStore, ProductStore, StoreResult};

pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ProductStore> CatalogService<S> {
    pub async fn create_product(&self, product: NewProduct) -> StoreResult<ProductId> {
        let id = self.store.insert_product(product).await?;
        tracing::debug!(product_id = %id, "product created");
        Ok(id)
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> StoreResult<Paged<Product>> {
        self.store.list_products(filter, page).await
    }
}

impl<S: OrderStore> CatalogService<S> {
    pub async fn list_user_orders(&self, user_id: &str, page: Page) -> StoreResult<Paged<Order>> {
        self.store.list_orders(user_id, page).await
    }
}
