//! Async HTTP client for an Appium (W3C WebDriver) server.
//!
//! This module provides [`AppiumClient`], the low-level transport that sends
//! JSON commands to the server and decodes the `{"value": ...}` envelopes via
//! [`crate::protocol::decode_response`]. It knows nothing about sessions or
//! elements; [`AppiumDriver`](crate::appium_driver::AppiumDriver) builds on it.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use swagdroid_core::appium_client::AppiumClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AppiumClient::new("http://127.0.0.1:4723", Duration::from_secs(60))?;
//! let status: serde_json::Value = client.get("status").await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, debug_span, trace, Instrument};

use crate::driver::DriverError;
use crate::protocol::decode_response;

/// JSON-over-HTTP transport to an Appium server.
#[derive(Debug, Clone)]
pub struct AppiumClient {
    http: reqwest::Client,
    base: String,
}

impl AppiumClient {
    /// Creates a client for the server at `server_url`.
    ///
    /// `timeout` bounds each HTTP request, including server-side implicit
    /// waits, so it should be longer than those.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, DriverError> {
        let url = Url::parse(server_url)
            .map_err(|e| DriverError::Http(format!("invalid server URL '{}': {}", server_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DriverError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DriverError> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DriverError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DriverError> {
        self.send::<T, ()>(Method::DELETE, path, None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DriverError> {
        let span = debug_span!("appium_command", %method, path);
        async {
            let mut request = self.http.request(method.clone(), self.endpoint(path));
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    DriverError::Timeout(format!("{} {}: {}", method, path, e))
                } else {
                    DriverError::Http(e.to_string())
                }
            })?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| DriverError::Http(e.to_string()))?;
            debug!(status = status.as_u16(), len = bytes.len(), "response");
            trace!(body = %String::from_utf8_lossy(&bytes), "response body");

            decode_response(status.as_u16(), &bytes)
        }
        .instrument(span)
        .await
    }
}
