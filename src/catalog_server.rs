// Product Service API Module
//
// Purpose: REST API over the product catalog stored in database.json
// Routes: /products (collection + bulk operations), /products/:id (single product)

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::catalog::{self, ProductInput};
use crate::config::CatalogConfig;
use crate::error::AppError;
use crate::json_store::JsonStore;
use crate::models::{Product, ProductDatabase};
use crate::utils::{is_digit_segment, iso_now};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct CatalogState {
    pub products: Arc<JsonStore<ProductDatabase>>,
}

impl CatalogState {
    /// Open (and if needed create) `database.json` under the configured data dir
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let store = JsonStore::new(config.database_path());
        store.ensure_exists()?;

        tracing::info!("Product database: {}", store.path().display());
        Ok(Self {
            products: Arc::new(store),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

/// The catalog router behind slash trimming: `/products/` and `//products/1/`
/// reach the same handlers as `/products` and `/products/1`
pub type CatalogApp = NormalizePath<Router>;

pub fn create_catalog_router(state: CatalogState) -> CatalogApp {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))

        // Collection endpoints
        .route(
            "/products",
            get(get_products)
                .post(create_product)
                .put(update_products)
                .delete(delete_products)
                .fallback(endpoint_not_found),
        )
        // Static segment wins over :id (Axum prefers static matches)
        .route(
            "/products/bulk",
            post(create_bulk_products).fallback(endpoint_not_found),
        )
        .route(
            "/products/:id",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(endpoint_not_found),
        )
        .fallback(endpoint_not_found)

        // Middleware (applied in reverse order)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Must wrap the whole router: layers added with `Router::layer` run after routing
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        "Request: {} {}",
        request.method(),
        request.uri().path().trim_matches('/')
    );
    next.run(request).await
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn endpoint_not_found() -> AppError {
    AppError::not_found("Endpoint not found")
}

async fn get_products(State(state): State<CatalogState>) -> Json<Vec<Product>> {
    Json(state.products.read().products)
}

async fn get_product(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = product_id(&id)?;

    state
        .products
        .read()
        .products
        .into_iter()
        .find(|p| p.id == id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product not found"))
}

async fn create_product(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let input = ProductInput::from_value(&parse_body(&body)?);
    let now = iso_now();

    let product = state
        .products
        .update(|db| catalog::create(db, &input, &now))
        .map_err(|e| e.into_app_error("Failed to save product"))?;

    tracing::info!("Created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

async fn create_bulk_products(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let body = parse_body(&body)?;
    let now = iso_now();

    let created = state
        .products
        .update(|db| catalog::create_bulk(db, &body, &now))
        .map_err(|e| e.into_app_error("Failed to save products"))?;

    tracing::info!("Created {} products", created.len());
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "products": created }))))
}

async fn update_product(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, AppError> {
    let id = product_id(&id)?;
    let input = ProductInput::from_value(&parse_body(&body)?);
    let now = iso_now();

    let product = state
        .products
        .update(|db| catalog::update(db, id, &input, &now))
        .map_err(|e| e.into_app_error("Failed to update product"))?;

    Ok(Json(product))
}

async fn update_products(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let body = parse_body(&body)?;
    let now = iso_now();

    let updated = state
        .products
        .update(|db| catalog::update_bulk(db, &body, &now))
        .map_err(|e| e.into_app_error("Failed to update products"))?;

    Ok(Json(serde_json::json!({ "products": updated })))
}

async fn delete_product(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = product_id(&id)?;

    state
        .products
        .update(|db| catalog::delete(db, id))
        .map_err(|e| e.into_app_error("Failed to delete product"))?;

    tracing::info!("Deleted product {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_products(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let body = parse_body(&body)?;

    let removed = state
        .products
        .update(|db| catalog::delete_many(db, &body))
        .map_err(|e| e.into_app_error("Failed to delete products"))?;

    tracing::info!("Deleted {} products", removed);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a request body as JSON; an empty body counts as `{}`
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::error!("Invalid request body: {}", e);
        AppError::bad_request("Invalid request data")
    })
}

/// Numeric `:id` segment. Anything but digits is not a product route at all.
fn product_id(segment: &str) -> Result<i64, AppError> {
    if !is_digit_segment(segment) {
        return Err(AppError::not_found("Endpoint not found"));
    }

    // Too many digits for any stored id
    segment
        .parse()
        .map_err(|_| AppError::not_found("Product not found"))
}
