//! `storefront-store` — the document store boundary.
//!
//! Defines the async store traits the services are written against, plus two
//! implementations: `MongoStore` (production) and `MemoryStore` (tests/dev).
//! Connection bootstrap, index creation, and the conditional-update
//! atomicity primitive all live here; no business rules do.

pub mod error;
pub mod memory;
pub mod mongo;
pub mod r#trait;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use r#trait::{Health, OrderStore, ProductStore, ReserveOutcome};
