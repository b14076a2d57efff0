//! Storefront product listing
//!
//! Joins catalog products with the EUR exchange rate and the gateway's
//! reviews into the shape the single-page UI renders.

use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::models::{Product, ProductView, Review};
use crate::utils::to_number;

/// Price converted with `rate` and formatted with exactly two decimals.
///
/// String prices are converted first; a price with no numeric value
/// shows as `"NaN"`.
pub fn euro_price(price: &Value, rate: f64) -> String {
    to_fixed_2(to_number(price) * rate)
}

/// Two-decimal rendering where an exact tie rounds away from zero
/// (`0.125` -> `"0.13"`); `{:.2}` alone would round it to even.
fn to_fixed_2(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0.00".to_string();
    }

    // A tie needs x = (2k + 1) / 200 exactly, which in binary means x is a multiple of 1/8
    let magnitude = x.abs();
    let cents = magnitude * 100.0;
    if (magnitude * 8.0).fract() == 0.0 && cents.fract() == 0.5 {
        let sign = if x < 0.0 { "-" } else { "" };
        return format!("{}{:.2}", sign, cents.ceil() / 100.0);
    }

    format!("{:.2}", x)
}

/// Attach EUR price and reviews (newest first) to every catalog product.
///
/// Catalog order is preserved. Reviews with an unparsable `date` sort after
/// all dated ones, keeping their stored order.
pub fn build_product_views(products: Vec<Product>, eur_rate: f64, reviews: Vec<Review>) -> Vec<ProductView> {
    let mut by_product: FxHashMap<i64, Vec<Review>> = FxHashMap::default();
    for review in reviews {
        by_product.entry(review.product_id).or_default().push(review);
    }

    for list in by_product.values_mut() {
        // Stable sort: equal dates keep stored order
        list.sort_by_cached_key(|review| std::cmp::Reverse(parse_date(&review.date)));
    }

    products
        .into_iter()
        .map(|product| ProductView {
            euro_price: euro_price(&product.price, eur_rate),
            // Catalog ids are not guaranteed unique; every match gets the reviews
            reviews: by_product.get(&product.id).cloned().unwrap_or_default(),
            product,
        })
        .collect()
}

fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(date).ok()
}
