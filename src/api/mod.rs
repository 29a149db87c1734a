//! HTTP client for the FlowDesk admin API.
//!
//! All network traffic goes through [`ApiClient`]: it attaches the bearer
//! credential when one is stored, retries rate-limited and transport-failed
//! requests with exponential backoff, and decodes the standard
//! `{success, message?, data}` envelope. Resource endpoints live in the
//! submodules, one `impl ApiClient` block per resource.
//!
//! Modules:
//! - auth: admin login/logout/me
//! - customers, projects, phases, tasks, documents, meetings, notifications,
//!   crew: REST resources
//! - token_store: bearer token persistence

pub mod auth;
pub mod crew;
pub mod customers;
pub mod documents;
pub mod meetings;
pub mod notifications;
pub mod phases;
pub mod projects;
pub mod tasks;
pub mod token_store;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::AppConfig;
use crate::types::Envelope;
use token_store::TokenStore;

// ============================================================================
// Error type
// ============================================================================

/// Failure taxonomy exposed to every caller. All variants are terminal for
/// the current user action; nothing above this layer retries.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP 429 with the retry budget exhausted. The raw HTTP error is not
    /// surfaced; callers show this message as-is.
    #[error("Server is busy. Please wait a moment and try again.")]
    RateLimited,
    /// Transport-level failure (connect, DNS, per-request timeout) with the
    /// retry budget exhausted.
    #[error("Unable to connect to server. Please check your connection.")]
    Connectivity,
    /// Any other non-2xx response, carrying the server-provided message when
    /// the body had one.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// No stored credential; the caller must log in first.
    #[error("Not authenticated. Run `flowdesk login` first.")]
    NotAuthenticated,
    /// Client-side pre-submission check failed.
    #[error("{0}")]
    Validation(String),
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

// ============================================================================
// Retry policy
// ============================================================================

/// Exponential backoff for 429 and transport failures.
///
/// Delay before the n-th retry (0-based) is `min(base * 2^n, max)`, which
/// with the defaults produces 1s, 2s, 4s, 8s, 16s across the 5-retry budget.
/// Deliberately jitter-free: the backend's rate limiter keys on the admin
/// session, not on a fleet of clients.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 16_000,
        }
    }
}

impl RetryPolicy {
    pub fn backoff_delay(&self, retry_index: u32) -> Duration {
        let exponent = 2u64.saturating_pow(retry_index);
        let ms = self
            .base_delay_ms
            .saturating_mul(exponent)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

fn transport_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

// ============================================================================
// Client
// ============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_parts(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
            RetryPolicy {
                max_retries: config.max_retries,
                ..RetryPolicy::default()
            },
            TokenStore::new(),
        )
    }

    /// Assemble a client from explicit parts. Tests point this at a local
    /// stub server and a temp-dir token store.
    pub fn with_parts(
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
        tokens: TokenStore,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            tokens,
        })
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint(path));
        if let Ok(stored) = self.tokens.load() {
            builder = builder.bearer_auth(stored.token);
        }
        builder
    }

    /// Issue a JSON request through the retry loop and decode the envelope.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<Envelope<T>, ApiError> {
        let mut builder = self.builder(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = send_with_retry(builder, &self.retry, path).await?;
        decode_envelope(response).await
    }

    /// Shorthand for body-less requests; `Option<&()>` does not infer.
    pub(crate) async fn request_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<Envelope<T>, ApiError> {
        self.request::<T>(method, path, None::<&serde_json::Value>)
            .await
    }

    /// Issue a request whose response payload is not used (deletes, status
    /// flips, logout). Error mapping matches [`ApiClient::request`]; the body
    /// is discarded on success.
    pub(crate) async fn request_ack(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<(), ApiError> {
        let mut builder = self.builder(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = send_with_retry(builder, &self.retry, path).await?;
        check_status(response).await.map(|_| ())
    }

    pub(crate) async fn request_ack_empty(
        &self,
        method: Method,
        path: &str,
    ) -> Result<(), ApiError> {
        self.request_ack(method, path, None::<&serde_json::Value>)
            .await
    }

    /// Submit a multipart form. Uploads are not idempotent, so there is no
    /// retry here: a transport failure or 429 surfaces on the first attempt.
    pub(crate) async fn request_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Envelope<T>, ApiError> {
        let builder = self.builder(Method::POST, path).multipart(form);
        let response = builder.send().await.map_err(|err| {
            if transport_retryable(&err) {
                ApiError::Connectivity
            } else {
                ApiError::Http(err)
            }
        })?;
        decode_envelope(response).await
    }
}

/// Send a request, retrying on 429 and transport failures with exponential
/// backoff. Returns the final response (which may still be a 429 once the
/// budget is spent) or a terminal transport error.
async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
    path: &str,
) -> Result<reqwest::Response, ApiError> {
    for retry_index in 0..=policy.max_retries {
        let retries_left = policy.max_retries - retry_index;
        let Some(attempt) = request.try_clone() else {
            // Streaming bodies can't be cloned; single shot.
            return request.send().await.map_err(|err| {
                if transport_retryable(&err) {
                    ApiError::Connectivity
                } else {
                    ApiError::Http(err)
                }
            });
        };

        match attempt.send().await {
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                if retries_left == 0 {
                    return Ok(response);
                }
                let delay = policy.backoff_delay(retry_index);
                log::warn!(
                    "rate limited on {}; retrying in {:?} ({} retries left)",
                    path,
                    delay,
                    retries_left
                );
                tokio::time::sleep(delay).await;
            }
            Ok(response) => return Ok(response),
            Err(err) if transport_retryable(&err) => {
                if retries_left == 0 {
                    return Err(ApiError::Connectivity);
                }
                let delay = policy.backoff_delay(retry_index);
                log::warn!(
                    "transport error on {}: {}; retrying in {:?} ({} retries left)",
                    path,
                    err,
                    delay,
                    retries_left
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(ApiError::Http(err)),
        }
    }
    // Every arm returns once retries_left hits zero.
    Err(ApiError::Connectivity)
}

/// Map the response status, returning the raw body bytes on success.
async fn check_status(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::RateLimited);
    }

    let bytes = response.bytes().await.map_err(ApiError::Http)?;
    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(bytes.to_vec())
}

/// Decode the `{success, message?, data}` body after status mapping.
async fn decode_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Envelope<T>, ApiError> {
    let bytes = check_status(response).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ============================================================================
// Tests
// ============================================================================
