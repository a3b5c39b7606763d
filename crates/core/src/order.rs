//! Order model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::id::{OrderId, ProductId};

/// One line of an order: a product reference plus how many units were bought.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub bought_quantity: i64,
}

/// A fully-validated order ready for insertion; the store assigns the
/// identifier. `created_on` is server-assigned, never taken from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    /// Caller-supplied total; persisted as-is (see checkout for the
    /// mismatch warning policy).
    pub total_amount: f64,
    pub user_address: BTreeMap<String, String>,
    pub created_on: DateTime<Utc>,
    pub user_id: String,
}

/// An order as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub user_address: BTreeMap<String, String>,
    pub created_on: DateTime<Utc>,
    pub user_id: String,
}
