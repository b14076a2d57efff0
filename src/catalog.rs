//! Product Catalog Operations
//!
//! Pure functions over [`ProductDatabase`]. They validate client input,
//! assign ids and timestamps, and report what the HTTP layer should answer.
//! Persisting the result is the caller's job (see `JsonStore::update`).
//!
//! Validation follows the storefront client's expectations. A field counts
//! as given when it is truthy (not `null`, `false`, `0` or `""`), and given
//! fields are stored exactly as sent:
//! - `name` and `price` are required
//! - `description` defaults to `""` on create and keeps the old value on update

use serde_json::Value;
use thiserror::Error;

use crate::models::{Product, ProductDatabase};
use crate::utils::{display_string, is_truthy, parse_int_value};

/// Why a catalog operation refused a request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Request body is missing required data (HTTP 400)
    #[error("{0}")]
    Invalid(String),

    /// Referenced product(s) do not exist (HTTP 404)
    #[error("{0}")]
    NotFound(String),
}

#[cfg(feature = "api")]
impl From<CatalogError> for crate::error::AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(msg) => crate::error::AppError::BadRequest(msg),
            CatalogError::NotFound(msg) => crate::error::AppError::NotFound(msg),
        }
    }
}

/// Product fields as sent by a client, before validation.
///
/// Only truthy fields are kept; the values themselves are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub description: Option<Value>,
}

impl ProductInput {
    /// Extract the product fields from an arbitrary JSON value; a non-object
    /// value has no fields at all
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).filter(|v| is_truthy(v)).cloned();

        ProductInput {
            id: field("id"),
            name: field("name"),
            price: field("price"),
            description: field("description"),
        }
    }

    /// Name and price, if both are present
    fn required(&self) -> Option<(&Value, &Value)> {
        Some((self.name.as_ref()?, self.price.as_ref()?))
    }
}

/// Next free id: 1 for an empty catalog, otherwise the highest id + 1
pub fn next_id(products: &[Product]) -> i64 {
    products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

fn new_product(id: i64, name: &Value, price: &Value, description: Option<&Value>, now: &str) -> Product {
    Product {
        id,
        name: name.clone(),
        price: price.clone(),
        description: description
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
        created_at: Some(now.to_string()),
        updated_at: None,
        extra: Default::default(),
    }
}

fn apply_update(product: &mut Product, name: &Value, price: &Value, description: Option<&Value>, now: &str) {
    product.name = name.clone();
    product.price = price.clone();
    if let Some(description) = description {
        product.description = description.clone();
    }
    product.updated_at = Some(now.to_string());
}

fn position_of(db: &ProductDatabase, id: i64) -> Option<usize> {
    db.products.iter().position(|p| p.id == id)
}

/// Items of a `{"products": [...]}` body
fn products_array(body: &Value) -> Result<&Vec<Value>, CatalogError> {
    body.get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::Invalid("Products array is required".to_string()))
}

// ============================================================================
// Create
// ============================================================================

/// Add one product with the next free id
pub fn create(db: &mut ProductDatabase, input: &ProductInput, now: &str) -> Result<Product, CatalogError> {
    let (name, price) = input
        .required()
        .ok_or_else(|| CatalogError::Invalid("Name and price are required".to_string()))?;

    let product = new_product(next_id(&db.products), name, price, input.description.as_ref(), now);
    db.products.push(product.clone());

    Ok(product)
}

/// Add every product of a `{"products": [...]}` body, or none of them.
///
/// Ids are assigned sequentially, continuing from the existing catalog.
pub fn create_bulk(db: &mut ProductDatabase, body: &Value, now: &str) -> Result<Vec<Product>, CatalogError> {
    let items = products_array(body)?;

    let mut created: Vec<Product> = Vec::with_capacity(items.len());
    let mut id = next_id(&db.products);

    for item in items {
        let input = ProductInput::from_value(item);
        let (name, price) = input.required().ok_or_else(|| {
            CatalogError::Invalid("Name and price are required for all products".to_string())
        })?;

        created.push(new_product(id, name, price, input.description.as_ref(), now));
        id += 1;
    }

    db.products.extend(created.iter().cloned());
    Ok(created)
}

// ============================================================================
// Update
// ============================================================================

/// Replace name, price and (when given) description of one product.
///
/// An unknown id is reported before the body is validated.
pub fn update(db: &mut ProductDatabase, id: i64, input: &ProductInput, now: &str) -> Result<Product, CatalogError> {
    let index = position_of(db, id)
        .ok_or_else(|| CatalogError::NotFound("Product not found".to_string()))?;

    let (name, price) = input
        .required()
        .ok_or_else(|| CatalogError::Invalid("Name and price are required".to_string()))?;

    let product = &mut db.products[index];
    apply_update(product, name, price, input.description.as_ref(), now);

    Ok(product.clone())
}

/// Update every product of a `{"products": [...]}` body, or none of them
pub fn update_bulk(db: &mut ProductDatabase, body: &Value, now: &str) -> Result<Vec<Product>, CatalogError> {
    let items = products_array(body)?;

    let mut staged = db.products.clone();
    let mut updated: Vec<Product> = Vec::with_capacity(items.len());

    for item in items {
        let input = ProductInput::from_value(item);
        let (raw_id, name, price) = match (input.id.as_ref(), input.required()) {
            (Some(id), Some((name, price))) => (id, name, price),
            _ => {
                return Err(CatalogError::Invalid(
                    "Id, name, and price are required for all products".to_string(),
                ))
            }
        };

        // "abc" is a given id that matches nothing; it is reported as sent
        let id = parse_int_value(raw_id);
        let product = staged
            .iter_mut()
            .find(|p| Some(p.id) == id)
            .ok_or_else(|| {
                CatalogError::NotFound(format!("Product with id {} not found", display_string(raw_id)))
            })?;

        apply_update(product, name, price, input.description.as_ref(), now);
        updated.push(product.clone());
    }

    db.products = staged;
    Ok(updated)
}

// ============================================================================
// Delete
// ============================================================================

/// Remove one product
pub fn delete(db: &mut ProductDatabase, id: i64) -> Result<Product, CatalogError> {
    let index = position_of(db, id)
        .ok_or_else(|| CatalogError::NotFound("Product not found".to_string()))?;

    Ok(db.products.remove(index))
}

/// Remove the products listed in `{"ids": [...]}`, or every product when
/// the body carries no `ids` array.
///
/// Only JSON numbers match ids; `"3"` does not remove product 3.
/// Returns how many products were removed.
pub fn delete_many(db: &mut ProductDatabase, body: &Value) -> Result<usize, CatalogError> {
    let Some(ids) = body.get("ids").and_then(Value::as_array) else {
        let removed = db.products.len();
        db.products.clear();
        return Ok(removed);
    };

    let ids: Vec<f64> = ids.iter().filter_map(Value::as_f64).collect();
    let before = db.products.len();
    db.products.retain(|p| !ids.contains(&(p.id as f64)));

    let removed = before - db.products.len();
    if removed == 0 {
        return Err(CatalogError::NotFound("No matching products found".to_string()));
    }
    Ok(removed)
}
