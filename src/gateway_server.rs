// Gateway API Module
//
// Purpose: backend-for-frontend for the storefront UI
// Combines: product catalog (HTTP) + EUR exchange rate (HTTP, cached) + cart.json + reviews.json

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::aggregate::build_product_views;
use crate::cart;
use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::json_store::JsonStore;
use crate::models::{Cart, CartItem, ProductView, Review, ReviewDatabase};
use crate::reviews;
use crate::upstream::UpstreamClient;
use crate::utils::{epoch_millis, iso_now};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct GatewayState {
    pub upstream: Arc<UpstreamClient>,
    pub cart: Arc<JsonStore<Cart>>,
    pub reviews: Arc<JsonStore<ReviewDatabase>>,
    /// Built UI served for every non-API path
    pub static_dir: Option<PathBuf>,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing upstream HTTP client...");
        let upstream = Arc::new(UpstreamClient::new(config)?);

        let cart = JsonStore::new(config.cart_path()).creating_on_read();
        let reviews = JsonStore::new(config.reviews_path()).creating_on_read();
        tracing::info!("Cart database: {}", cart.path().display());
        tracing::info!("Reviews database: {}", reviews.path().display());

        Ok(Self {
            upstream,
            cart: Arc::new(cart),
            reviews: Arc::new(reviews),
            static_dir: config.static_dir.clone(),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_gateway_router(state: GatewayState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))

        // Storefront listing
        .route("/api/products", get(get_products))

        // Cart endpoints
        .route("/api/cart", get(get_cart).post(add_to_cart))
        .route("/api/cart/:product_id", delete(remove_from_cart))

        // Review endpoints
        .route(
            "/api/products/:product_id/reviews",
            get(get_reviews).post(create_review),
        );

    // Built UI, if configured; otherwise unknown paths are JSON 404s
    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(|| async { AppError::not_found("Endpoint not found") }),
    };

    router
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // The UI is served from another origin in development
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
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

/// Catalog products with EUR price and their reviews (newest first)
async fn get_products(State(state): State<GatewayState>) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = state.upstream.fetch_products().await.map_err(upstream_failure)?;
    let eur_rate = state.upstream.fetch_eur_rate().await.map_err(upstream_failure)?;
    let reviews = state.reviews.read().reviews;

    tracing::debug!(
        "Merging {} products with {} reviews at EUR rate {}",
        products.len(),
        reviews.len(),
        eur_rate
    );

    Ok(Json(build_product_views(products, eur_rate, reviews)))
}

async fn get_cart(State(state): State<GatewayState>) -> Json<Vec<CartItem>> {
    Json(state.cart.read().items)
}

async fn add_to_cart(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Vec<CartItem>>), AppError> {
    let body = parse_body(&body)?;

    let items = state
        .cart
        .update(|cart| cart::add_product(cart, &body))
        .map_err(|e| e.into_app_error("failed to update cart"))?;

    Ok((StatusCode::CREATED, Json(items)))
}

async fn remove_from_cart(
    State(state): State<GatewayState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<CartItem>>, AppError> {
    let items = state
        .cart
        .update(|cart| Ok::<_, AppError>(cart::remove_product(cart, &product_id)))
        .map_err(|e| e.into_app_error("failed to update cart"))?;

    Ok(Json(items))
}

async fn get_reviews(
    State(state): State<GatewayState>,
    Path(product_id): Path<String>,
) -> Json<Vec<Review>> {
    tracing::debug!("Received request for product reviews: {}", product_id);
    Json(reviews::for_product(&state.reviews.read(), &product_id))
}

async fn create_review(
    State(state): State<GatewayState>,
    Path(product_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let body = parse_body(&body)?;
    tracing::debug!("Review POST received for product {}: {}", product_id, body);

    let review = state
        .reviews
        .update(|db| reviews::add_review(db, &product_id, &body, epoch_millis(), &iso_now()))
        .map_err(|e| {
            if let crate::json_store::UpdateError::Rejected(reason) = &e {
                tracing::info!("Rejected review for product {}: {}", product_id, reason);
            }
            e.into_app_error("failed to save review")
        })?;

    tracing::info!("Saved review {} for product {}", review.id, review.product_id);
    Ok((StatusCode::CREATED, Json(review)))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn upstream_failure(err: crate::upstream::UpstreamError) -> AppError {
    tracing::error!("Error fetching products: {}", err);
    AppError::Upstream {
        message: "unable to fetch products".to_string(),
        details: err.to_string(),
    }
}

/// Parse a JSON request body; an empty body counts as `{}`
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Malformed JSON body: {}", e);
        AppError::bad_request("invalid JSON body")
    })
}
