//! Product model and catalog filter semantics.

use crate::id::ProductId;

/// A product as stored. `quantity` is only guarded against going negative
/// at order time; creation accepts whatever the caller supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Payload for product creation; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Catalog listing filter.
///
/// `name` is a case-insensitive substring match; `size` is a
/// case-insensitive whole-word match against the same name field (sizes are
/// conventionally part of the product name, e.g. "Large T-Shirt"). When both
/// are present they AND-combine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub size: Option<String>,
}

impl ProductFilter {
    /// Evaluate the filter against a product name.
    ///
    /// This is the reference semantics; the MongoDB backend compiles the
    /// same rules into `$regex` clauses, the in-memory backend calls this
    /// directly.
    pub fn matches(&self, product_name: &str) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|needle| contains_ci(product_name, needle));
        let size_ok = self
            .size
            .as_deref()
            .is_none_or(|needle| contains_word_ci(product_name, needle));
        name_ok && size_ok
    }
}

/// Case-insensitive substring test.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive whole-word test. Word characters are alphanumerics and
/// underscore, matching the `\b` boundary the MongoDB query uses.
fn contains_word_ci(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(&needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let left_ok = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let right_ok = haystack[end..].chars().next().is_none_or(|c| !is_word_char(c));
        if left_ok && right_ok {
            return true;
        }
        start = end;
    }
    false
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
