// file: src/provider/aladhan.rs
use super::{TimingsProvider, TimingsQuery};
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::ProviderTimings;
use crate::utils::circuit_breaker::get_circuit_breaker;
use crate::utils::logging::log_network_error;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.aladhan.com/v1";
const BREAKER: &str = "aladhan";

#[derive(Debug, Deserialize)]
struct Envelope {
    data: ProviderTimings,
}

/// Client for the Aladhan `timingsByCity` endpoint.
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    base_url: String,
}

impl AladhanClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = HttpConfig::timings_api().build_client()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn timings_url(&self, query: &TimingsQuery) -> AppResult<Url> {
        Url::parse_with_params(
            &format!("{}/timingsByCity", self.base_url),
            &[
                ("city", query.location.city.as_str()),
                ("country", query.location.country.as_str()),
                ("method", &query.method.to_string()),
                ("school", &query.school.value().to_string()),
            ],
        )
        .map_err(|e| AppError::config(format!("Invalid timings URL '{}': {}", self.base_url, e)))
    }

    async fn request(&self, url: Url) -> AppResult<ProviderTimings> {
        let response = self.client.get(url).send().await.map_err(|e| {
            log_network_error("Timings request", &e);
            AppError::provider(format!("Timings request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::provider(format!("Timings request failed: {}", status)));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| AppError::provider(format!("Unreadable timings response: {}", e)))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl TimingsProvider for AladhanClient {
    async fn fetch_timings(&self, query: &TimingsQuery) -> AppResult<ProviderTimings> {
        let url = self.timings_url(query)?;
        debug!("Fetching prayer times for {}", query.location);

        let breaker = get_circuit_breaker(BREAKER).await;
        breaker.execute(|| self.request(url)).await
    }
}
