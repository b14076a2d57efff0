// Product Service Binary Entry Point
//
// Purpose: Serve the product catalog API over database.json
// Usage: cargo run --bin product_service

use axum::{extract::Request, ServiceExt};
use std::net::SocketAddr;
use storefront::shutdown::shutdown_signal;
use storefront::{create_catalog_router, CatalogConfig, CatalogState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "storefront=info,product_service=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting product service...");

    let config = CatalogConfig::from_env();
    config.log_summary();

    let state = CatalogState::new(&config)?;
    let app = create_catalog_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on port {}", config.port);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Product service stopped");
    Ok(())
}
