//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque and store-generated: BSON ObjectIds under the
//! hood, rendered as 24-character hex strings at the API boundary.

use core::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::InvalidIdError;

/// Identifier of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(ObjectId);

/// Identifier of an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(ObjectId);

macro_rules! impl_oid_newtype {
    ($t:ty, $kind:literal) => {
        impl $t {
            /// Create a fresh identifier. Normally the store generates these;
            /// prefer passing IDs explicitly in tests for determinism.
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            /// Hex rendering used in JSON responses.
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<ObjectId> for $t {
            fn from(value: ObjectId) -> Self {
                Self(value)
            }
        }

        impl From<$t> for ObjectId {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s).map(Self).map_err(|_| InvalidIdError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

impl_oid_newtype!(ProductId, "product");
impl_oid_newtype!(OrderId, "order");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hex() {
        let id = ProductId::new();
        let parsed: ProductId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_malformed_input() {
        let err = "not-an-object-id".parse::<ProductId>().unwrap_err();
        assert_eq!(err.kind, "product");
        assert_eq!(err.value, "not-an-object-id");
    }

    #[test]
    fn display_is_hex() {
        let id = OrderId::new();
        assert_eq!(id.to_string(), id.to_hex());
        assert_eq!(id.to_string().len(), 24);
    }
}
