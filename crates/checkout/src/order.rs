//! Order assembly: validate every line, commit reservations, persist.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use storefront_core::{NewOrder, OrderId, OrderItem, ProductId};
use storefront_store::{OrderStore, ProductStore, StoreError};

use crate::ledger::{InventoryLedger, ReserveError};

/// Fallback identity when neither an explicit id nor a usable address entry
/// is present.
const DEFAULT_USER_ID: &str = "default_user";

/// The `userAddress` key historically used as a stand-in identity. A
/// placeholder, not a security boundary.
const ADDRESS_IDENTITY_KEY: &str = "City";

/// Tolerance when cross-checking the caller-supplied total against current
/// prices.
const TOTAL_EPSILON: f64 = 0.005;

/// An incoming order, exactly as the caller shaped it. Product ids are still
/// raw strings at this point; validation turns them into typed ids.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub total_amount: f64,
    pub user_address: BTreeMap<String, String>,
    /// Explicit identity; absent callers fall back to the address-derived
    /// placeholder.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub bought_quantity: i64,
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("invalid product ID: {0}")]
    InvalidProductId(String),

    #[error("bought quantity must be positive for product {product_id}, got {requested}")]
    InvalidQuantity { product_id: ProductId, requested: i64 },

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("insufficient quantity for product {product_id}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates multi-item order validation, commit, and persistence.
pub struct OrderAssembler<S> {
    ledger: InventoryLedger<S>,
    store: Arc<S>,
}

impl<S: ProductStore + OrderStore> OrderAssembler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            ledger: InventoryLedger::new(store.clone()),
            store,
        }
    }

    /// Two-phase order creation.
    ///
    /// Phase one validates every line in caller order and fails fast with no
    /// side effects at all. Phase two commits the reservations, again in
    /// caller order; a mid-commit failure (stock drained by a concurrent
    /// order between the two phases) releases the lines already reserved
    /// before the error is reported. On success exactly one order document
    /// is inserted.
    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderId, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let items = self.validate(&request).await?;
        self.commit(&items).await?;

        let user_id = derive_user_id(request.user_id.as_deref(), &request.user_address);
        let order_id = self
            .store
            .insert_order(NewOrder {
                items,
                total_amount: request.total_amount,
                user_address: request.user_address,
                created_on: Utc::now(),
                user_id,
            })
            .await?;
        debug!(order_id = %order_id, "order created");
        Ok(order_id)
    }

    /// Validation pass: ids parse, products exist, quantities are positive
    /// and covered by current stock. First failure wins and names the
    /// offending item.
    async fn validate(&self, request: &OrderRequest) -> Result<Vec<OrderItem>, OrderError> {
        let mut items = Vec::with_capacity(request.items.len());
        let mut expected_total = 0.0;

        for item in &request.items {
            let product_id = ProductId::from_str(&item.product_id)
                .map_err(|_| OrderError::InvalidProductId(item.product_id.clone()))?;
            if item.bought_quantity <= 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id,
                    requested: item.bought_quantity,
                });
            }

            let product = self
                .store
                .find_product(product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(product_id))?;
            if product.quantity < item.bought_quantity {
                return Err(OrderError::InsufficientStock {
                    product_id,
                    available: product.quantity,
                    requested: item.bought_quantity,
                });
            }

            expected_total += product.price * item.bought_quantity as f64;
            items.push(OrderItem {
                product_id,
                bought_quantity: item.bought_quantity,
            });
        }

        // The supplied total is persisted as-is; a mismatch against current
        // prices is only worth a log line.
        if (expected_total - request.total_amount).abs() > TOTAL_EPSILON {
            warn!(
                supplied = request.total_amount,
                expected = expected_total,
                "order total does not match current prices; storing supplied value"
            );
        }

        Ok(items)
    }

    /// Commit pass: reserve each line strictly in caller order.
    async fn commit(&self, items: &[OrderItem]) -> Result<(), OrderError> {
        for (idx, item) in items.iter().enumerate() {
            if let Err(err) = self
                .ledger
                .try_reserve(item.product_id, item.bought_quantity)
                .await
            {
                self.rollback(&items[..idx]).await;
                return Err(self.commit_failure(item, err).await);
            }
        }
        Ok(())
    }

    /// Release already-reserved lines, most recent first.
    async fn rollback(&self, reserved: &[OrderItem]) {
        for item in reserved.iter().rev() {
            if let Err(err) = self.ledger.release(item.product_id, item.bought_quantity).await {
                // The quantity stays off by this line until operator
                // intervention; all we can do is record it.
                tracing::error!(
                    product_id = %item.product_id,
                    amount = item.bought_quantity,
                    %err,
                    "failed to release reserved stock during rollback"
                );
            }
        }
    }

    /// Map a commit-time reserve failure. The insufficient path re-reads the
    /// product so the report carries the quantity actually left.
    async fn commit_failure(&self, item: &OrderItem, err: ReserveError) -> OrderError {
        match err {
            ReserveError::NotFound(id) => OrderError::ProductNotFound(id),
            ReserveError::Insufficient(id) => {
                let available = match self.store.find_product(id).await {
                    Ok(Some(product)) => product.quantity,
                    _ => 0,
                };
                OrderError::InsufficientStock {
                    product_id: id,
                    available,
                    requested: item.bought_quantity,
                }
            }
            // Validation already rejected non-positive quantities.
            ReserveError::InvalidAmount(_) => OrderError::InvalidQuantity {
                product_id: item.product_id,
                requested: item.bought_quantity,
            },
            ReserveError::Store(e) => OrderError::Store(e),
        }
    }
}

/// Resolve the identity an order is recorded under: the explicit `userId`
/// when present and non-blank, otherwise the address "City" entry, otherwise
/// a fixed default.
pub fn derive_user_id(explicit: Option<&str>, address: &BTreeMap<String, String>) -> String {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| address.get(ADDRESS_IDENTITY_KEY).cloned())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}
