//! Resilient HTTP client for the open-data endpoints.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde_json::Value;

use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::errors::FetchError;
use crate::retry::RetryPolicy;

/// Timeouts, retry, and breaker settings for one client instance.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// TCP connect timeout per attempt.
    pub connect_timeout: Duration,
    /// Overall per-attempt timeout covering the response read.
    pub read_timeout: Duration,
    /// Responses slower than this are logged but still succeed.
    pub slow_response_threshold: Duration,
    pub retry: RetryPolicy,
    pub breaker: BreakerConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(15),
            slow_response_threshold: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            breaker: BreakerConfig::default(),
        }
    }
}

/// HTTP client wrapping outbound GETs in circuit-breaker and retry
/// discipline.
///
/// All calls consult the shared [`CircuitBreaker`] before touching the
/// network, retry transient failures per the [`RetryPolicy`], and report
/// the outcome back to the breaker. Failures are returned as
/// [`FetchError`] values, never panics.
pub struct OpenDataClient {
    http: reqwest::Client,
    breaker: Arc<CircuitBreaker>,
    config: FetchConfig,
}

impl OpenDataClient {
    /// Create a client with default timeouts and breaker settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a client with custom settings. Used by tests to shrink
    /// timeouts and thresholds.
    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(concat!("krestate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            http,
            breaker: Arc::new(CircuitBreaker::new(config.breaker)),
            config,
        })
    }

    /// The circuit breaker shared by this client's requests.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Fetch a URL and return the response body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with(url, &[], |body| Ok(body.to_owned())).await
    }

    /// Fetch a URL and return the decoded JSON body. A decode failure on a
    /// 2xx response is a [`FetchError::Parse`] and does not count against
    /// the circuit breaker.
    pub async fn fetch_json(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Value, FetchError> {
        self.fetch_with(url, headers, |body| {
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
        })
        .await
    }

    /// Shared fetch path: breaker gate, retry loop, decode, accounting.
    ///
    /// The decode step runs before `record_success` so a corrupt payload
    /// leaves the breaker untouched in either direction.
    async fn fetch_with<T>(
        &self,
        url: &str,
        headers: &[(String, String)],
        decode: impl Fn(&str) -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        self.breaker.can_execute()?;

        let request_id = request_id();
        let started = Instant::now();
        let max_attempts = self.config.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            tracing::debug!(%request_id, url, attempt, "http request start");

            let result = self.send_get(url, headers).await;
            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !response.status().is_success() {
                        self.breaker.record_failure();
                        tracing::error!(
                            %request_id,
                            url,
                            status,
                            duration_ms = started.elapsed().as_millis() as u64,
                            "http status error"
                        );
                        return Err(FetchError::HttpStatus { status });
                    }

                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(e) => {
                            self.breaker.record_failure();
                            tracing::error!(%request_id, url, error = %e, "failed to read response body");
                            return Err(FetchError::Network(e.to_string()));
                        }
                    };

                    let decoded = match decode(&body) {
                        Ok(decoded) => decoded,
                        Err(e) => {
                            // Payload corruption is not evidence the
                            // upstream is down.
                            tracing::error!(%request_id, url, error = %e, "payload decode error");
                            return Err(e);
                        }
                    };

                    let elapsed = started.elapsed();
                    if elapsed > self.config.slow_response_threshold {
                        tracing::warn!(
                            %request_id,
                            url,
                            duration_ms = elapsed.as_millis() as u64,
                            threshold_ms = self.config.slow_response_threshold.as_millis() as u64,
                            "slow upstream response"
                        );
                    }
                    tracing::info!(
                        %request_id,
                        url,
                        duration_ms = elapsed.as_millis() as u64,
                        "http request success"
                    );
                    self.breaker.record_success();
                    return Ok(decoded);
                }
                Err(e) if is_transient(&e) => {
                    tracing::warn!(
                        %request_id,
                        url,
                        attempt,
                        error = %e,
                        "transient request failure"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry.delay_for_attempt(attempt)).await;
                    }
                }
                Err(e) => {
                    self.breaker.record_failure();
                    tracing::error!(%request_id, url, error = %e, "request failed");
                    return Err(FetchError::Network(e.to_string()));
                }
            }
        }

        // All attempts timed out or failed to connect. One breaker failure
        // for the whole sequence, not one per attempt.
        self.breaker.record_failure();
        tracing::error!(
            %request_id,
            url,
            attempts = max_attempts,
            duration_ms = started.elapsed().as_millis() as u64,
            "retries exhausted"
        );
        Err(FetchError::RetriesExhausted {
            attempts: max_attempts,
        })
    }

    async fn send_get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.http.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request.send().await
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

/// Short correlation id tagging all log events of one logical request.
fn request_id() -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_short_hex() {
        let id = request_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn default_config_matches_documented_values() {
        let config = FetchConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.slow_response_threshold, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.breaker.failure_threshold, 5);
    }
}
