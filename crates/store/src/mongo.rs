//! MongoDB-backed store implementation.
//!
//! The conditional-update primitive (`try_reserve`) is a single
//! `find_one_and_update` with the quantity guard in the filter, so the stock
//! check and the decrement cannot be interleaved by a concurrent request.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bson::{Bson, DateTime as BsonDateTime, Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use storefront_core::{
    NewOrder, NewProduct, Order, OrderId, OrderItem, Page, Paged, Product, ProductFilter,
    ProductId,
};

use crate::error::{StoreError, StoreResult};
use crate::r#trait::{Health, OrderStore, ProductStore, ReserveOutcome};

const DB_NAME: &str = "ecommerce";
const PRODUCTS: &str = "products";
const ORDERS: &str = "orders";

/// Bounded wait to establish connectivity; a bad URL fails fast at startup
/// instead of hanging the first request.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// Handle to the backing database. Cheap to clone; the underlying client
/// keeps its own connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    price: f64,
    quantity: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderItemDocument {
    #[serde(rename = "productId")]
    product_id: ObjectId,
    #[serde(rename = "boughtQuantity")]
    bought_quantity: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    items: Vec<OrderItemDocument>,
    #[serde(rename = "totalAmount")]
    total_amount: f64,
    #[serde(rename = "userAddress")]
    user_address: BTreeMap<String, String>,
    #[serde(rename = "createdOn")]
    created_on: BsonDateTime,
    user_id: String,
}

impl MongoStore {
    /// Connect, verify reachability, and ensure the query indexes exist.
    pub async fn connect(uri: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;
        let db = client.database(DB_NAME);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { db };
        store.ensure_indexes().await?;
        tracing::info!("connected to MongoDB");
        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        self.products()
            .create_index(IndexModel::builder().keys(doc! { "name": 1 }).build())
            .await?;
        self.orders()
            .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
            .await?;
        self.orders()
            .create_index(IndexModel::builder().keys(doc! { "createdOn": 1 }).build())
            .await?;
        Ok(())
    }

    fn products(&self) -> Collection<ProductDocument> {
        self.db.collection(PRODUCTS)
    }

    fn orders(&self) -> Collection<OrderDocument> {
        self.db.collection(ORDERS)
    }
}

/// Compile a catalog filter into the products query document.
///
/// `name` becomes a case-insensitive escaped `$regex`; `size` a
/// case-insensitive whole-word regex on the same field; both present
/// combine via `$and`.
fn products_query(filter: &ProductFilter) -> Document {
    let name_clause = filter.name.as_deref().map(|name| {
        doc! { "name": { "$regex": regex::escape(name), "$options": "i" } }
    });
    let size_clause = filter.size.as_deref().map(|size| {
        doc! { "name": { "$regex": format!(r"\b{}\b", regex::escape(size)), "$options": "i" } }
    });

    match (name_clause, size_clause) {
        (Some(name), Some(size)) => doc! { "$and": [name, size] },
        (Some(clause), None) | (None, Some(clause)) => clause,
        (None, None) => Document::new(),
    }
}

fn generated_id(inserted_id: Bson) -> StoreResult<ObjectId> {
    inserted_id.as_object_id().ok_or_else(|| {
        StoreError::Codec(format!("store-generated id was not an ObjectId: {inserted_id}"))
    })
}

impl ProductDocument {
    fn into_product(self) -> StoreResult<Product> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Codec("product document missing _id".into()))?;
        Ok(Product {
            id: id.into(),
            name: self.name,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

impl OrderDocument {
    fn from_new(order: NewOrder) -> Self {
        Self {
            id: None,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemDocument {
                    product_id: item.product_id.into(),
                    bought_quantity: item.bought_quantity,
                })
                .collect(),
            total_amount: order.total_amount,
            user_address: order.user_address,
            created_on: BsonDateTime::from_chrono(order.created_on),
            user_id: order.user_id,
        }
    }

    fn into_order(self) -> StoreResult<Order> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Codec("order document missing _id".into()))?;
        Ok(Order {
            id: id.into(),
            items: self
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id.into(),
                    bought_quantity: item.bought_quantity,
                })
                .collect(),
            total_amount: self.total_amount,
            user_address: self.user_address,
            created_on: self.created_on.to_chrono(),
            user_id: self.user_id,
        })
    }
}

#[async_trait]
impl ProductStore for MongoStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<ProductId> {
        let document = ProductDocument {
            id: None,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
        };
        let result = self.products().insert_one(document).await?;
        generated_id(result.inserted_id).map(ProductId::from)
    }

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let document = self
            .products()
            .find_one(doc! { "_id": ObjectId::from(id) })
            .await?;
        document.map(ProductDocument::into_product).transpose()
    }

    async fn list_products(&self, filter: &ProductFilter, page: Page) -> StoreResult<Paged<Product>> {
        let query = products_query(filter);
        let total = self.products().count_documents(query.clone()).await?;
        let documents: Vec<ProductDocument> = self
            .products()
            .find(query)
            .sort(doc! { "_id": 1 })
            .skip(u64::from(page.offset))
            .limit(i64::from(page.limit))
            .await?
            .try_collect()
            .await?;
        let data = documents
            .into_iter()
            .map(ProductDocument::into_product)
            .collect::<StoreResult<_>>()?;
        Ok(Paged { data, total, page })
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn try_reserve(&self, id: ProductId, amount: i64) -> StoreResult<ReserveOutcome> {
        let oid = ObjectId::from(id);
        let updated = self
            .products()
            .find_one_and_update(
                doc! { "_id": oid, "quantity": { "$gte": amount } },
                doc! { "$inc": { "quantity": -amount } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(document) => Ok(ReserveOutcome::Reserved(document.quantity)),
            // Zero matches: a follow-up read tells a missing product apart
            // from thin stock. Failure path only.
            None => match self.products().find_one(doc! { "_id": oid }).await? {
                Some(_) => Ok(ReserveOutcome::Insufficient),
                None => Ok(ReserveOutcome::NotFound),
            },
        }
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn release(&self, id: ProductId, amount: i64) -> StoreResult<()> {
        let result = self
            .products()
            .update_one(
                doc! { "_id": ObjectId::from(id) },
                doc! { "$inc": { "quantity": amount } },
            )
            .await?;
        if result.matched_count == 0 {
            tracing::warn!(product_id = %id, amount, "release matched no product");
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MongoStore {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId> {
        let result = self.orders().insert_one(OrderDocument::from_new(order)).await?;
        generated_id(result.inserted_id).map(OrderId::from)
    }

    async fn list_orders(&self, user_id: &str, page: Page) -> StoreResult<Paged<Order>> {
        let query = doc! { "user_id": user_id };
        let total = self.orders().count_documents(query.clone()).await?;
        let documents: Vec<OrderDocument> = self
            .orders()
            .find(query)
            .sort(doc! { "_id": 1 })
            .skip(u64::from(page.offset))
            .limit(i64::from(page.limit))
            .await?
            .try_collect()
            .await?;
        let data = documents
            .into_iter()
            .map(OrderDocument::into_order)
            .collect::<StoreResult<_>>()?;
        Ok(Paged { data, total, page })
    }
}

#[async_trait]
impl Health for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_compiles_to_empty_query() {
        assert_eq!(products_query(&ProductFilter::default()), Document::new());
    }

    #[test]
    fn name_filter_escapes_and_ignores_case() {
        let filter = ProductFilter {
            name: Some("t-shirt (v2)".to_string()),
            size: None,
        };
        let query = products_query(&filter);
        let clause = query.get_document("name").unwrap();
        assert_eq!(clause.get_str("$regex").unwrap(), r"t\-shirt \(v2\)");
        assert_eq!(clause.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn size_filter_is_word_bounded() {
        let filter = ProductFilter {
            name: None,
            size: Some("large".to_string()),
        };
        let query = products_query(&filter);
        let clause = query.get_document("name").unwrap();
        assert_eq!(clause.get_str("$regex").unwrap(), r"\blarge\b");
    }

    #[test]
    fn combined_filters_and_together() {
        let filter = ProductFilter {
            name: Some("shirt".to_string()),
            size: Some("large".to_string()),
        };
        let query = products_query(&filter);
        let clauses = query.get_array("$and").unwrap();
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn order_document_round_trips_to_domain() {
        let order = NewOrder {
            items: vec![OrderItem {
                product_id: ProductId::new(),
                bought_quantity: 2,
            }],
            total_amount: 51.98,
            user_address: BTreeMap::from([("City".to_string(), "New York".to_string())]),
            created_on: chrono::Utc::now(),
            user_id: "New York".to_string(),
        };

        let mut document = OrderDocument::from_new(order.clone());
        document.id = Some(ObjectId::new());
        let stored = document.into_order().unwrap();

        assert_eq!(stored.items, order.items);
        assert_eq!(stored.total_amount, order.total_amount);
        assert_eq!(stored.user_address, order.user_address);
        assert_eq!(stored.user_id, order.user_id);
        // BSON datetimes carry millisecond precision.
        assert_eq!(
            stored.created_on.timestamp_millis(),
            order.created_on.timestamp_millis()
        );
    }
}
