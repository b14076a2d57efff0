//! Shopping Cart Operations
//!
//! The cart is a flat list of product snapshots with a quantity. Adding a
//! product that is already in the cart bumps its quantity; removing drops
//! every entry with that product id.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Cart, CartItem};
use crate::utils::parse_int;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    #[error("product is required")]
    ProductRequired,
}

#[cfg(feature = "api")]
impl From<CartError> for crate::error::AppError {
    fn from(err: CartError) -> Self {
        crate::error::AppError::BadRequest(err.to_string())
    }
}

/// Add the `product` object of a `{"product": {...}}` body to the cart.
///
/// Returns the full item list after the change.
pub fn add_product(cart: &mut Cart, body: &Value) -> Result<Vec<CartItem>, CartError> {
    let mut details = match body.get("product") {
        Some(Value::Object(product)) => product.clone(),
        _ => return Err(CartError::ProductRequired),
    };

    let id = details.remove("id").filter(|id| !id.is_null());
    details.remove("quantity");

    match cart.items.iter_mut().find(|item| item.id == id) {
        Some(existing) => {
            existing.quantity = existing.quantity.saturating_add(1);
            tracing::debug!("Cart quantity for {:?} is now {}", id, existing.quantity);
        }
        None => {
            tracing::debug!("Adding product {:?} to cart", id);
            cart.items.push(CartItem { id, details, quantity: 1 });
        }
    }

    Ok(cart.items.clone())
}

/// Remove every item whose id equals the leading integer of `product_id`.
///
/// An id that does not parse removes nothing.
pub fn remove_product(cart: &mut Cart, product_id: &str) -> Vec<CartItem> {
    if let Some(id) = parse_int(product_id) {
        cart.items
            .retain(|item| item.id.as_ref().and_then(Value::as_i64) != Some(id));
    }

    cart.items.clone()
}
