//! Gateway upstream clients
//!
//! The gateway talks to two HTTP services:
//! - the product catalog (`GET /products`)
//! - a public exchange-rate API (`{"rates": {"EUR": 0.92, ...}}`)
//!
//! The EUR rate changes slowly, so it is kept in a Moka cache for
//! `rates_cache_ttl` instead of being fetched for every page view.

use moka::future::Cache;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::models::Product;

const EUR: &str = "EUR";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("exchange rates do not include {0}")]
    MissingRate(String),
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// HTTP client for the catalog and currency services
pub struct UpstreamClient {
    http: reqwest::Client,
    product_service_url: String,
    currency_service_url: String,
    /// `None` when caching is disabled (TTL of zero)
    rates: Option<Cache<&'static str, f64>>,
}

impl UpstreamClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        let rates = (!config.rates_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(16)
                .time_to_live(config.rates_cache_ttl)
                .build()
        });

        Ok(Self {
            http,
            product_service_url: config.product_service_url.clone(),
            currency_service_url: config.currency_service_url.clone(),
            rates,
        })
    }

    /// Every product in the catalog
    pub async fn fetch_products(&self) -> Result<Vec<Product>, UpstreamError> {
        tracing::debug!("Fetching products from {}", self.product_service_url);
        self.get_json(&self.product_service_url).await
    }

    /// USD → EUR conversion rate
    pub async fn fetch_eur_rate(&self) -> Result<f64, UpstreamError> {
        if let Some(cache) = &self.rates {
            if let Some(rate) = cache.get(EUR).await {
                tracing::debug!("Cache hit for {} rate", EUR);
                return Ok(rate);
            }
        }

        tracing::debug!("Fetching exchange rates from {}", self.currency_service_url);
        let response: RatesResponse = self.get_json(&self.currency_service_url).await?;
        let rate = response
            .rates
            .get(EUR)
            .copied()
            .ok_or_else(|| UpstreamError::MissingRate(EUR.to_string()))?;

        if let Some(cache) = &self.rates {
            cache.insert(EUR, rate).await;
        }
        Ok(rate)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let http_error = |source| UpstreamError::Http { url: url.to_string(), source };

        let response = self.http.get(url).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { url: url.to_string(), status });
        }

        response.json::<T>().await.map_err(http_error)
    }
}
