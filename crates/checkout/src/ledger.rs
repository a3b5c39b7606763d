//! Inventory ledger: authoritative product quantities plus the conditional
//! decrement primitive.

use std::sync::Arc;

use thiserror::Error;

use storefront_core::ProductId;
use storefront_store::{ProductStore, ReserveOutcome, StoreError};

/// Why a reservation was refused.
#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("reservation amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("insufficient stock for product {0}")]
    Insufficient(ProductId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the invariant: a product's recorded quantity never goes negative
/// due to a processed order.
#[derive(Debug)]
pub struct InventoryLedger<S> {
    store: Arc<S>,
}

impl<S: ProductStore> InventoryLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Conditionally take `amount` units off the shelf.
    ///
    /// Succeeds only if the product exists and currently holds at least
    /// `amount`; the check and the decrement are one store-level filtered
    /// update, so two concurrent reservations cannot both pass the check
    /// first. Returns the post-decrement quantity.
    pub async fn try_reserve(&self, id: ProductId, amount: i64) -> Result<i64, ReserveError> {
        if amount <= 0 {
            return Err(ReserveError::InvalidAmount(amount));
        }
        match self.store.try_reserve(id, amount).await? {
            ReserveOutcome::Reserved(remaining) => {
                tracing::debug!(product_id = %id, amount, remaining, "reserved stock");
                Ok(remaining)
            }
            ReserveOutcome::Insufficient => Err(ReserveError::Insufficient(id)),
            ReserveOutcome::NotFound => Err(ReserveError::NotFound(id)),
        }
    }

    /// Put `amount` units back. Compensation path for a multi-item commit
    /// that failed partway.
    pub async fn release(&self, id: ProductId, amount: i64) -> Result<(), ReserveError> {
        self.store.release(id, amount).await?;
        tracing::debug!(product_id = %id, amount, "released stock");
        Ok(())
    }
}
