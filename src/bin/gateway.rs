// Gateway Binary Entry Point
//
// Purpose: Serve the storefront backend-for-frontend (products, cart, reviews)
// Usage: PRODUCT_SERVICE_URL=http://localhost:3000/products cargo run --bin gateway

use std::net::SocketAddr;
use storefront::shutdown::shutdown_signal;
use storefront::{create_gateway_router, GatewayConfig, GatewayState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "storefront=info,gateway=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gateway...");

    let config = GatewayConfig::from_env();
    config.log_summary();

    tracing::info!("Initializing application state...");
    let state = GatewayState::new(&config)?;
    let app = create_gateway_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}
