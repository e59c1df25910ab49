// Resilient HTTP client
// Wraps reqwest with a bounded linear-backoff retry loop and
// cooperative per-request cancellation

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::utils::config::Config;

/// Attempts per request unless the descriptor overrides it
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Per-attempt timeout unless the descriptor overrides it
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
/// Backoff grows by this much after each failed attempt
pub const BACKOFF_STEP_MS: u64 = 2_000;
/// Upper bound on any single backoff delay
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Why a fetch ultimately failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// True when the call ended because the caller cancelled it
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }

    /// User-facing copy for the dashboard's error banner
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => {
                "Request timed out. The server is taking too long to respond. Please try again later."
            }
            FetchError::Network { .. } => {
                "Unable to connect to the server. Please check your internet connection and try again."
            }
            FetchError::Cancelled { .. } => "Request was cancelled.",
            _ => "Failed to fetch data. Please try again later.",
        }
    }
}

/// Immutable description of one logical request. Retry state lives in
/// the send loop, never here, so descriptors can be shared and reused.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub max_attempts: u32,
    pub timeout_ms: u64,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        let mut descriptor = Self::new(Method::POST, url);
        descriptor.body = Some(body);
        descriptor
    }

    pub fn put(url: impl Into<String>, body: Value) -> Self {
        let mut descriptor = Self::new(Method::PUT, url);
        descriptor.body = Some(body);
        descriptor
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the attempt budget; 0 is treated as a single attempt
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Give up after the first failure
    pub fn no_retry(mut self) -> Self {
        self.max_attempts = 1;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Create a linked cancel handle/token pair
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Caller-side switch that aborts an in-flight request
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Abort the request and any pending backoff sleep
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Request-side receiver watched by the send loop
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. If the handle is
    /// dropped without cancelling, this never resolves.
    async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Delay before the next attempt after `failed_attempts` failures,
/// linear in the failure count and capped
pub fn backoff_delay(failed_attempts: u32) -> Duration {
    Duration::from_millis((BACKOFF_STEP_MS * u64::from(failed_attempts)).min(MAX_BACKOFF_MS))
}

/// HTTP client that retries transient failures with capped backoff.
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    http: reqwest::Client,
    max_attempts: u32,
    timeout_ms: u64,
}

impl ResilientClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_settings(DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS)
    }

    /// Client whose requests default to the given budget and timeout
    pub fn with_settings(max_attempts: u32, timeout_ms: u64) -> Result<Self, reqwest::Error> {
        // The dashboard API rides on cookie sessions alongside headers
        let http = reqwest::Client::builder()
            .user_agent(concat!("codetrack/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            max_attempts: max_attempts.max(1),
            timeout_ms,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::with_settings(config.max_attempts, config.request_timeout_ms)
    }

    /// Descriptor pre-tuned with this client's budget and timeout
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor::new(method, url)
            .max_attempts(self.max_attempts)
            .timeout_ms(self.timeout_ms)
    }

    /// Send a request, retrying failures until the descriptor's attempt
    /// budget runs out. Returns the decoded JSON body.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Value, FetchError> {
        let (_handle, token) = cancel_pair();
        self.send_cancellable(descriptor, token).await
    }

    /// Like `send`, but the caller keeps a handle that can abort the
    /// request (including a pending backoff) at any point
    pub async fn send_cancellable(
        &self,
        descriptor: &RequestDescriptor,
        cancel: CancelToken,
    ) -> Result<Value, FetchError> {
        run_with_retry(&descriptor.url, descriptor.max_attempts, cancel, || {
            self.attempt(descriptor)
        })
        .await
    }

    /// One attempt: send, check the status, decode the body
    async fn attempt(&self, descriptor: &RequestDescriptor) -> Result<Value, FetchError> {
        let mut request = self
            .http
            .request(descriptor.method.clone(), &descriptor.url)
            .timeout(Duration::from_millis(descriptor.timeout_ms));

        for (name, value) in &descriptor.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(&descriptor.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: descriptor.url.clone(),
                status,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify_send_error(&descriptor.url, e))?;

        // 204-style responses carry no body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            url: descriptor.url.clone(),
            source: e,
        })
    }
}

fn classify_send_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

/// The retry loop itself. Every failure kind consumes one attempt from
/// the budget; cancellation wins over both in-flight attempts and
/// backoff sleeps and is never retried.
async fn run_with_retry<F, Fut>(
    url: &str,
    max_attempts: u32,
    mut cancel: CancelToken,
    mut attempt: F,
) -> Result<Value, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<Value, FetchError>>,
{
    let budget = max_attempts.max(1);

    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled {
            url: url.to_string(),
        });
    }

    let mut failed = 0u32;
    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(FetchError::Cancelled { url: url.to_string() });
            }
            outcome = attempt() => outcome,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(error) => {
                failed += 1;
                if failed >= budget {
                    warn!("Request to {} failed after {} attempt(s): {}", url, failed, error);
                    return Err(error);
                }

                let delay = backoff_delay(failed);
                debug!(
                    "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                    failed, budget, url, error, delay
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return Err(FetchError::Cancelled { url: url.to_string() });
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn status_failure() -> FetchError {
        FetchError::HttpStatus {
            url: "http://test".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn test_backoff_schedule_is_linear_and_capped() {
        assert_eq!(backoff_delay(1), Duration::from_millis(2_000));
        assert_eq!(backoff_delay(2), Duration::from_millis(4_000));
        assert_eq!(backoff_delay(3), Duration::from_millis(6_000));
        assert_eq!(backoff_delay(4), Duration::from_millis(8_000));
        assert_eq!(backoff_delay(5), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(6), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(50), Duration::from_millis(10_000));
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = RequestDescriptor::get("http://test/x");
        assert_eq!(descriptor.method, Method::GET);
        assert_eq!(descriptor.max_attempts, 3);
        assert_eq!(descriptor.timeout_ms, 15_000);
        assert!(descriptor.body.is_none());
        assert!(descriptor.headers.is_empty());
    }

    #[test]
    fn test_descriptor_builders() {
        let descriptor = RequestDescriptor::post("http://test/x", serde_json::json!({"a": 1}))
            .header("Authorization", "Bearer t")
            .max_attempts(5)
            .timeout_ms(1_000);

        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.max_attempts, 5);
        assert_eq!(descriptor.timeout_ms, 1_000);
        assert_eq!(descriptor.headers.len(), 1);
        assert!(descriptor.body.is_some());
    }

    #[test]
    fn test_descriptor_no_retry_and_zero_clamp() {
        assert_eq!(RequestDescriptor::get("http://t").no_retry().max_attempts, 1);
        assert_eq!(RequestDescriptor::get("http://t").max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let timeout = FetchError::Timeout { url: "u".into() };
        let status = status_failure();
        let cancelled = FetchError::Cancelled { url: "u".into() };

        assert!(timeout.user_message().contains("timed out"));
        assert!(status.user_message().contains("Failed to fetch"));
        assert!(cancelled.user_message().contains("cancelled"));
        assert!(!timeout.is_cancelled());
        assert!(cancelled.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_budget_then_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (_handle, token) = cancel_pair();

        let result = run_with_retry("http://test", 3, token, || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::HttpStatus { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_sum_between_attempts() {
        let (_handle, token) = cancel_pair();
        let start = Instant::now();

        let result = run_with_retry("http://test", 3, token, || async {
            Err(status_failure())
        })
        .await;

        assert!(result.is_err());
        // 2s after the first failure, 4s after the second
        assert_eq!(start.elapsed(), Duration::from_millis(6_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_second_attempt_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (_handle, token) = cancel_pair();

        let result = run_with_retry("http://test", 3, token, move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(status_failure())
                } else {
                    Ok(serde_json::json!({ "ok": true }))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap()["ok"], true);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_budget_fails_fast() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (_handle, token) = cancel_pair();
        let start = Instant::now();

        let result = run_with_retry("http://test", 1, token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_still_attempts_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (_handle, token) = cancel_pair();

        let _ = run_with_retry("http://test", 0, token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_prevents_next_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (handle, token) = cancel_pair();

        let task = tokio::spawn(run_with_retry("http://test", 3, token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        }));

        // First attempt fails immediately, then the 2s backoff starts
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(FetchError::Cancelled { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start_performs_no_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (handle, token) = cancel_pair();
        handle.cancel();

        let result = run_with_retry("http://test", 3, token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        })
        .await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_leaves_call_running() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (handle, token) = cancel_pair();
        drop(handle);

        let result = run_with_retry("http://test", 2, token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(status_failure()) }
        })
        .await;

        // No cancellation, the budget just runs out
        assert!(matches!(result, Err(FetchError::HttpStatus { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_client_request_applies_settings() {
        let client = ResilientClient::with_settings(5, 2_000).unwrap();
        let descriptor = client.request(Method::GET, "http://test/x");
        assert_eq!(descriptor.max_attempts, 5);
        assert_eq!(descriptor.timeout_ms, 2_000);
    }
}
