//! In-memory store for tests/dev. Not optimized for performance.
//!
//! Atomicity of `try_reserve` comes from the interior lock: check and
//! decrement happen under one write guard, mirroring the single filtered
//! update the MongoDB backend issues.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bson::oid::ObjectId;

use storefront_core::{
    NewOrder, NewProduct, Order, OrderId, Page, Paged, Product, ProductFilter, ProductId,
};

use crate::error::{StoreError, StoreResult};
use crate::r#trait::{Health, OrderStore, ProductStore, ReserveOutcome};

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<ObjectId, Product>,
    orders: HashMap<ObjectId, Order>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".into()))
    }
}

/// Page a pre-filtered result set, sorted by ascending identifier.
fn paginate<T>(mut items: Vec<T>, page: Page, sort_key: impl Fn(&T) -> [u8; 12]) -> Paged<T> {
    items.sort_by_key(|item| sort_key(item));
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect();
    Paged { data, total, page }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<ProductId> {
        let id = ObjectId::new();
        self.write()?.products.insert(
            id,
            Product {
                id: id.into(),
                name: product.name,
                price: product.price,
                quantity: product.quantity,
            },
        );
        Ok(id.into())
    }

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.get(id.as_object_id()).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter, page: Page) -> StoreResult<Paged<Product>> {
        let matching: Vec<Product> = self
            .read()?
            .products
            .values()
            .filter(|product| filter.matches(&product.name))
            .cloned()
            .collect();
        Ok(paginate(matching, page, |product| {
            product.id.as_object_id().bytes()
        }))
    }

    async fn try_reserve(&self, id: ProductId, amount: i64) -> StoreResult<ReserveOutcome> {
        let mut inner = self.write()?;
        match inner.products.get_mut(id.as_object_id()) {
            None => Ok(ReserveOutcome::NotFound),
            Some(product) if product.quantity >= amount => {
                product.quantity -= amount;
                Ok(ReserveOutcome::Reserved(product.quantity))
            }
            Some(_) => Ok(ReserveOutcome::Insufficient),
        }
    }

    async fn release(&self, id: ProductId, amount: i64) -> StoreResult<()> {
        let mut inner = self.write()?;
        match inner.products.get_mut(id.as_object_id()) {
            Some(product) => product.quantity += amount,
            None => tracing::warn!(product_id = %id, amount, "release matched no product"),
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId> {
        let id = ObjectId::new();
        self.write()?.orders.insert(
            id,
            Order {
                id: id.into(),
                items: order.items,
                total_amount: order.total_amount,
                user_address: order.user_address,
                created_on: order.created_on,
                user_id: order.user_id,
            },
        );
        Ok(id.into())
    }

    async fn list_orders(&self, user_id: &str, page: Page) -> StoreResult<Paged<Order>> {
        let matching: Vec<Order> = self
            .read()?
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        Ok(paginate(matching, page, |order| {
            order.id.as_object_id().bytes()
        }))
    }
}

#[async_trait]
impl Health for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_product(name: &str, price: f64, quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn product_round_trips_through_the_store() {
        let store = MemoryStore::new();
        let id = store
            .insert_product(new_product("Large T-Shirt", 25.99, 100))
            .await
            .unwrap();

        let product = store.find_product(id).await.unwrap().unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.name, "Large T-Shirt");
        assert_eq!(product.price, 25.99);
        assert_eq!(product.quantity, 100);
        assert_eq!(id.to_hex().len(), 24);
    }

    #[tokio::test]
    async fn try_reserve_decrements_and_reports_remaining() {
        let store = MemoryStore::new();
        let id = store.insert_product(new_product("Mug", 4.0, 5)).await.unwrap();

        assert_eq!(
            store.try_reserve(id, 3).await.unwrap(),
            ReserveOutcome::Reserved(2)
        );
        assert_eq!(
            store.try_reserve(id, 3).await.unwrap(),
            ReserveOutcome::Insufficient
        );
        // failed attempt left the quantity alone
        let product = store.find_product(id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 2);
    }

    #[tokio::test]
    async fn try_reserve_unknown_product_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.try_reserve(ProductId::new(), 1).await.unwrap(),
            ReserveOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn release_restores_reserved_stock() {
        let store = MemoryStore::new();
        let id = store.insert_product(new_product("Mug", 4.0, 5)).await.unwrap();
        store.try_reserve(id, 5).await.unwrap();
        store.release(id, 5).await.unwrap();

        let product = store.find_product(id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 5);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_reservations_never_oversell() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .insert_product(new_product("Socks", 3.5, 10))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.try_reserve(id, 3).await.unwrap() },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), ReserveOutcome::Reserved(_)) {
                successes += 1;
            }
        }

        // floor(10 / 3) equal-amount attempts can succeed, no more.
        assert_eq!(successes, 3);
        let product = store.find_product(id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 1);
    }

    #[tokio::test]
    async fn listing_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        store
            .insert_product(new_product("Large T-Shirt", 25.99, 10))
            .await
            .unwrap();
        store
            .insert_product(new_product("Small T-Shirt", 19.99, 10))
            .await
            .unwrap();
        store.insert_product(new_product("Mug", 4.0, 10)).await.unwrap();

        let filter = ProductFilter {
            name: Some("shirt".to_string()),
            size: None,
        };
        let listed = store
            .list_products(&filter, Page::default())
            .await
            .unwrap();
        assert_eq!(listed.total, 2);
        assert!(listed.data.iter().all(|p| p.name.contains("T-Shirt")));

        // ascending by id, offset past the first match
        let second_page = store
            .list_products(&filter, Page { limit: 10, offset: 1 })
            .await
            .unwrap();
        assert_eq!(second_page.total, 2);
        assert_eq!(second_page.data.len(), 1);
        assert_eq!(second_page.data[0].id, listed.data[1].id);
    }

    #[tokio::test]
    async fn order_listing_is_scoped_to_the_user() {
        let store = MemoryStore::new();
        let product = store.insert_product(new_product("Mug", 4.0, 10)).await.unwrap();

        for user in ["New York", "New York", "Boston"] {
            store
                .insert_order(NewOrder {
                    items: vec![storefront_core::OrderItem {
                        product_id: product,
                        bought_quantity: 1,
                    }],
                    total_amount: 4.0,
                    user_address: Default::default(),
                    created_on: chrono::Utc::now(),
                    user_id: user.to_string(),
                })
                .await
                .unwrap();
        }

        let orders = store.list_orders("New York", Page::default()).await.unwrap();
        assert_eq!(orders.total, 2);
        assert!(orders.data.iter().all(|o| o.user_id == "New York"));
        // ascending identifier order
        assert!(orders.data[0].id.to_hex() <= orders.data[1].id.to_hex());
    }
}
