//! REST facade over the vehicle-rental backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views call `get`/`post`/`put`/`delete`/`upload` with paths relative to the
//! configured base URL and bind to the client's [`RequestStatus`] for spinners
//! and error banners. One `reqwest::Client` is built per configuration and
//! shared by every clone and scoped copy.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is logged, recorded in `status.error` (the server's
//! `{ "message": ... }` when present, else a fixed per-operation fallback), and
//! then returned unchanged. Nothing is retried or swallowed.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::RequestBuilder;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::state::request::RequestStatus;

/// Path of the health endpoint, relative to the base URL.
pub const HEALTH_PATH: &str = "/health";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: Value },

    /// A successful body did not match the requested type.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The `message` field of an error response body, if it is truthy.
    ///
    /// Strings are used as is; other truthy values (non-zero numbers, `true`,
    /// arrays, objects) are rendered as JSON text.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        match body.get("message")? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_owned()),
            value @ (Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
            _ => None,
        }
    }

    /// HTTP status of an error response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Facade operation, used for logging and fallback error text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Health,
    Get,
    Post,
    Put,
    Delete,
    Upload,
}

impl Operation {
    /// Error text recorded when the server supplies no message.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Health => "API connection failed",
            Self::Get => "GET request failed",
            Self::Post => "POST request failed",
            Self::Put => "PUT request failed",
            Self::Delete => "DELETE request failed",
            Self::Upload => "Upload failed",
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP facade with observable request status.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    status: RequestStatus,
}

impl ApiClient {
    /// Build a client with a JSON content type, the configured timeout, and a
    /// cookie store only when credentials are enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend fails to initialize.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .cookie_store(config.with_credentials)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self { http, base_url: config.base_url.clone(), status: RequestStatus::new() })
    }

    /// Copy sharing the connection pool but tracking its own status.
    #[must_use]
    pub fn scoped(&self) -> Self {
        Self { http: self.http.clone(), base_url: self.base_url.clone(), status: RequestStatus::new() }
    }

    #[must_use]
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Reset the recorded error without touching other flags.
    pub fn clear_error(&self) {
        self.status.clear_error();
    }

    /// Probe `GET /health`. Sets `connected` and clears `error` on success.
    ///
    /// Does not touch `loading`.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error after setting `connected = false`.
    pub async fn check_connection(&self) -> Result<Value, ApiError> {
        let url = self.url(HEALTH_PATH);
        tracing::debug!(%url, "health check");

        match execute(self.http.get(&url)).await {
            Ok(body) => {
                self.status.set_connected(true);
                self.status.clear_error();
                Ok(body)
            }
            Err(e) => {
                self.status.set_connected(false);
                self.record_failure(Operation::Health, &url, &e);
                Err(e)
            }
        }
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self.http.get(&url);
        self.call(Operation::Get, url, request).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.post(&url).json(body);
        self.call(Operation::Post, url, request).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.put(&url).json(body);
        self.call(Operation::Put, url, request).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self.http.delete(&url);
        self.call(Operation::Delete, url, request).await
    }

    /// `POST path` with a multipart form. The multipart content type (with
    /// boundary) replaces the JSON default for this request only.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self.http.post(&url).multipart(form);
        self.call(Operation::Upload, url, request).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        url: String,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let _loading = self.status.begin();
        tracing::debug!(?operation, %url, "api request");

        let result = match execute(request).await {
            Ok(body) => serde_json::from_value(body).map_err(ApiError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            self.record_failure(operation, &url, e);
        }
        result
    }

    fn record_failure(&self, operation: Operation, url: &str, error: &ApiError) {
        match error {
            ApiError::Status { status, body } => {
                tracing::error!(?operation, %url, status, %body, "API error");
            }
            other => tracing::error!(?operation, %url, error = %other, "API error"),
        }
        let message = error
            .server_message()
            .unwrap_or_else(|| operation.fallback_message().to_owned());
        self.status.set_error(message);
    }
}

/// Send `request` and decode the body; non-2xx statuses become errors.
async fn execute(request: RequestBuilder) -> Result<Value, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = decode_body(&bytes);

    if !status.is_success() {
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    Ok(body)
}

/// Empty bodies are `null`; bodies that are not JSON are kept as a string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Join a request path onto the base URL.
///
/// Slashes at the seam collapse to one. Absolute `http(s)` paths are used as
/// is, and an empty path addresses the base URL itself.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    if path.is_empty() {
        return base.to_owned();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
