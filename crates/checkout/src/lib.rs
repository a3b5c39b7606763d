//! `storefront-checkout` — the order-creation core.
//!
//! Two components: the inventory ledger (atomic check-and-decrement per
//! product) and the order assembler (multi-item validation, commit with
//! compensation, persistence). This is the one place where correctness
//! under concurrent requests matters.

pub mod ledger;
pub mod order;

pub use ledger::{InventoryLedger, ReserveError};
pub use order::{OrderAssembler, OrderError, OrderItemRequest, OrderRequest};
