/// Request Executor - HTTP Transport for the Probe
///
/// **Core Responsibility:**
/// Issue one bounded HTTP request and hand back the parsed JSON body
/// with its status code.
///
/// **Critical Architectural Boundary:**
/// - Client knows HOW to reach the service (base URL, timeouts, JSON
///   and multipart encoding)
/// - Client does NOT judge responses - validators in checks.rs own the
///   endpoint contracts
/// - Non-2xx statuses are data, not errors; only transport failures
///   surface as CallError
///
/// **Why This Exists:**
/// Keeps every network failure mode inside one boundary so the runner
/// can convert it into a recorded result instead of a crash.
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Transport-level failure for a single request attempt.
#[derive(Debug, Error)]
pub enum CallError {
    /// Connection failure or timeout before a usable response arrived.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered, but the body is not JSON.
    #[error("non-JSON response (HTTP {status}): {snippet}")]
    NonJson { status: u16, snippet: String },
}

/// Parsed response from one request attempt.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = reqwest::Client::builder()
            .user_agent(concat!("placementor-probe/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get(&self, path: &str, timeout: Duration) -> Result<ApiResponse, CallError> {
        self.execute(self.http.get(self.url(path)), timeout).await
    }

    pub async fn get_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<ApiResponse, CallError> {
        self.execute(self.http.get(self.url(path)).query(query), timeout)
            .await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<ApiResponse, CallError> {
        self.execute(self.http.post(self.url(path)).json(body), timeout)
            .await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
    ) -> Result<ApiResponse, CallError> {
        self.execute(self.http.post(self.url(path)).multipart(form), timeout)
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Single attempt, no retries. These are verification calls against
    /// a live system; retrying would mask real defects.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<ApiResponse, CallError> {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                CallError::Network(format!("timed out after {}ms", timeout.as_millis()))
            } else {
                CallError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CallError::Network(e.to_string()))?;

        let body: Value = serde_json::from_str(&text).map_err(|_| CallError::NonJson {
            status,
            snippet: snippet(&text),
        })?;

        Ok(ApiResponse { status, body })
    }
}

/// Bounded excerpt of a non-JSON body for failure details.
fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    text.chars().take(MAX_CHARS).collect()
}
