//! HTTP client configuration
//!
//! Centralized timeouts and connection settings for outbound calls.

use crate::error::{AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    /// Idle pooled connections are dropped after this long
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(45),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("prayer-times/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prayer timings are a small JSON document; fail fast so the cache can
    /// answer instead.
    pub fn timings_api() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            ..Self::default()
        }
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> AppResult<Client> {
        ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(2)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))
    }
}
