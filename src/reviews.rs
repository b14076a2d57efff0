//! Product Reviews
//!
//! Reviews live in the gateway's own `reviews.json`, keyed by catalog
//! product id. The catalog is never consulted: a review for an id the
//! catalog does not know is accepted and simply never shown.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Review, ReviewDatabase};
use crate::utils::{parse_int, parse_int_value};

const DEFAULT_NICKNAME: &str = "Anonymous";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("valid product id is required")]
    InvalidProductId,

    #[error("rating must be between 1 and 5")]
    InvalidRating,
}

#[cfg(feature = "api")]
impl From<ReviewError> for crate::error::AppError {
    fn from(err: ReviewError) -> Self {
        crate::error::AppError::BadRequest(err.to_string())
    }
}

/// Reviews of one product in stored order; an unparsable id matches nothing
pub fn for_product(db: &ReviewDatabase, product_id: &str) -> Vec<Review> {
    let Some(id) = parse_int(product_id) else {
        return Vec::new();
    };

    db.reviews
        .iter()
        .filter(|review| review.product_id == id)
        .cloned()
        .collect()
}

/// Validate a `{"nickname", "rating", "comment"}` body and append the review.
///
/// `id` and `date` come from the caller's clock so the rules stay testable.
pub fn add_review(
    db: &mut ReviewDatabase,
    product_id: &str,
    body: &Value,
    id: i64,
    date: &str,
) -> Result<Review, ReviewError> {
    let product_id = parse_int(product_id)
        .filter(|id| *id != 0)
        .ok_or(ReviewError::InvalidProductId)?;

    let rating = body
        .get("rating")
        .and_then(parse_int_value)
        .filter(|r| (1..=5).contains(r))
        .ok_or(ReviewError::InvalidRating)?;

    let text = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let review = Review {
        id,
        product_id,
        nickname: text("nickname").unwrap_or_else(|| DEFAULT_NICKNAME.to_string()),
        rating,
        comment: text("comment").unwrap_or_default(),
        date: date.to_string(),
    };

    db.reviews.push(review.clone());
    Ok(review)
}
