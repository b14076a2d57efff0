//! Persisted Records
//!
//! Each service keeps one JSON document on disk:
//! - `database.json`: `{"products": [...]}` (product service)
//! - `cart.json`: `{"items": [...]}` (gateway)
//! - `reviews.json`: `{"reviews": [...]}` (gateway)
//!
//! Field names follow the browser client's camelCase convention. Unknown
//! fields on products and cart items are carried through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Product catalog
// ============================================================================

/// A catalog product as stored in `database.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    /// Kept exactly as the client sent it; usually a string
    pub name: Value,
    /// Kept exactly as the client sent it: `12`, `12.5` and `"12"` all occur
    pub price: Value,
    #[serde(default = "empty_description")]
    pub description: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fields written by older clients or by hand; preserved on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_description() -> Value {
    Value::String(String::new())
}

/// Root document of `database.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDatabase {
    #[serde(default)]
    pub products: Vec<Product>,
}

// ============================================================================
// Cart
// ============================================================================

/// A product in the cart together with how many times it was added
///
/// The item is the product object exactly as the client posted it, so the
/// cart can render without calling the catalog again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id as sent by the client; usually a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub quantity: u32,
}

/// Root document of `cart.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

// ============================================================================
// Reviews
// ============================================================================

/// A customer review of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Epoch milliseconds at creation
    pub id: i64,
    pub product_id: i64,
    pub nickname: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    /// ISO-8601 creation time
    pub date: String,
}

/// Root document of `reviews.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewDatabase {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

// ============================================================================
// Gateway output
// ============================================================================

/// Product as shown by the storefront: catalog data, EUR price and reviews
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Price converted to EUR, formatted with two decimals
    pub euro_price: String,
    /// Newest first
    pub reviews: Vec<Review>,
}
