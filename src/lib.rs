//! Storefront Services
//!
//! Two small HTTP services behind a single-page storefront UI:
//! - Product service (`product_service` binary, port 3000): CRUD over the
//!   catalog kept in `database.json`
//! - Gateway (`gateway` binary, port 5000): backend-for-frontend that merges
//!   catalog products with a EUR exchange rate and customer reviews, and owns
//!   the cart (`cart.json`) and reviews (`reviews.json`)
//!
//! Every piece of state is one JSON document, read whole and rewritten whole
//! on each mutation (see [`json_store`]).
//!
//! Module layout:
//! - `models`: persisted records and the gateway's product view
//! - `catalog`, `cart`, `reviews`, `aggregate`: request rules as pure functions
//! - `catalog_server`, `gateway_server`: Axum routers (feature `api`)
//! - `upstream`: reqwest clients for the catalog and currency APIs (feature `api`)

pub mod aggregate;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod json_store;
pub mod models;
pub mod reviews;
pub mod utils;

#[cfg(feature = "api")]
pub mod catalog_server;
#[cfg(feature = "api")]
pub mod gateway_server;
#[cfg(feature = "api")]
pub mod shutdown;
#[cfg(feature = "api")]
pub mod upstream;

// Re-export commonly used types
pub use config::{CatalogConfig, GatewayConfig};
pub use error::StoreError;
pub use json_store::{JsonStore, UpdateError};
pub use models::{Cart, CartItem, Product, ProductDatabase, ProductView, Review, ReviewDatabase};

#[cfg(feature = "api")]
pub use catalog_server::{create_catalog_router, CatalogApp, CatalogState};
#[cfg(feature = "api")]
pub use error::AppError;
#[cfg(feature = "api")]
pub use gateway_server::{create_gateway_router, GatewayState};
