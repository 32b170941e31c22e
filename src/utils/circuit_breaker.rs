use crate::error::{AppError, AppResult};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Counters {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_time: Option<Instant>,
}

/// Fails calls fast once a service has failed `failure_threshold` times in a
/// row, then lets traffic back through after `timeout`.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: RwLock<Counters>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: RwLock::new(Counters {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_time: None,
            }),
        }
    }

    pub async fn execute<F, T, Fut>(&self, operation: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = AppResult<T>> + Send,
    {
        {
            let mut inner = self.inner.write().await;
            if inner.state == CircuitState::Open {
                let cooled_down = inner
                    .last_failure_time
                    .map(|at| at.elapsed() > self.config.timeout)
                    .unwrap_or(false);
                if !cooled_down {
                    return Err(AppError::provider(format!(
                        "Circuit breaker '{}' is open",
                        self.name
                    )));
                }
                inner.state = CircuitState::HalfOpen;
                inner.success_count = 0;
                info!("Circuit breaker '{}' transitioning to half-open after timeout", self.name);
            }
        }

        let result = operation().await;
        match &result {
            Ok(_) => self.on_success().await,
            Err(_) => self.on_failure().await,
        }
        result
    }

    async fn on_success(&self) {
        let mut inner = self.inner.write().await;
        match inner.state {
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    info!(
                        "Circuit breaker '{}' closing after {} successful calls",
                        self.name, inner.success_count
                    );
                }
            }
            CircuitState::Closed | CircuitState::Open => {
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
            }
        }
    }

    async fn on_failure(&self) {
        let mut inner = self.inner.write().await;
        inner.failure_count += 1;
        inner.last_failure_time = Some(Instant::now());

        let trips = match inner.state {
            CircuitState::HalfOpen => true,
            CircuitState::Closed => inner.failure_count >= self.config.failure_threshold,
            CircuitState::Open => false,
        };
        if trips {
            inner.state = CircuitState::Open;
            warn!(
                "Circuit breaker '{}' opening after {} failures",
                self.name, inner.failure_count
            );
        }
    }

    pub async fn get_state(&self) -> CircuitState {
        self.inner.read().await.state.clone()
    }

    pub async fn get_stats(&self) -> CircuitBreakerStats {
        let inner = self.inner.read().await;
        CircuitBreakerStats {
            state: inner.state.clone(),
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            last_failure_time: inner.last_failure_time,
        }
    }

    /// Forces the breaker closed and clears its counters.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.last_failure_time = None;
    }
}

#[derive(Debug)]
pub struct CircuitBreakerStats {
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    pub last_failure_time: Option<Instant>,
}

// Global circuit breaker registry for different services
pub struct CircuitBreakerRegistry {
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreakerRegistry {
    pub fn new() -> Self {
        Self {
            breakers: RwLock::new(HashMap::new()),
        }
    }

    fn config_for(service_name: &str) -> CircuitBreakerConfig {
        match service_name {
            // One timings call per load; give up quickly and let the cache serve
            "aladhan" => CircuitBreakerConfig {
                failure_threshold: 3,
                success_threshold: 1,
                timeout: Duration::from_secs(120),
            },
            _ => CircuitBreakerConfig::default(),
        }
    }

    pub async fn get_breaker(&self, service_name: &str) -> Arc<CircuitBreaker> {
        if let Some(breaker) = self.breakers.read().await.get(service_name) {
            return breaker.clone();
        }

        let mut breakers = self.breakers.write().await;
        breakers
            .entry(service_name.to_string())
            .or_insert_with(|| {
                info!("Created circuit breaker for service: {}", service_name);
                Arc::new(CircuitBreaker::new(service_name, Self::config_for(service_name)))
            })
            .clone()
    }
}

// Global instance
lazy_static::lazy_static! {
    pub static ref CIRCUIT_BREAKER_REGISTRY: CircuitBreakerRegistry = CircuitBreakerRegistry::new();
}

pub async fn get_circuit_breaker(service_name: &str) -> Arc<CircuitBreaker> {
    CIRCUIT_BREAKER_REGISTRY.get_breaker(service_name).await
}
