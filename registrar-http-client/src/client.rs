//! HTTP client implementation.

use http::{HeaderMap, HeaderName, HeaderValue, header};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::{HttpClientConfig, HttpClientError, Response, Result};

/// HTTP client performing exactly one round trip per call.
///
/// Retrying is left to [`RetryDriver`](crate::RetryDriver) so that every
/// attempt is visible to the caller.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let headers = default_headers(&config)?;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpClientError::RequestBuild(e.to_string()))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(HttpClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Serialize `body` as JSON and `PUT` it to `url`.
    ///
    /// The response body is read to completion before returning, whatever
    /// the status code.
    pub async fn put_json<T>(&self, url: &str, body: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| HttpClientError::Json(e.to_string()))?;

        debug!(url, bytes = payload.len(), "Sending PUT request");

        let timeout = self.config.timeout;
        let response = self
            .inner
            .put(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| HttpClientError::from_send(e, timeout))?;

        let response = Response::from_reqwest(response)
            .await
            .map_err(|e| HttpClientError::from_send(e, timeout))?;

        debug!(url, status = %response.status(), "Received response");
        Ok(response)
    }
}

fn default_headers(config: &HttpClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.default_headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| HttpClientError::RequestBuild(format!("header {name}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| HttpClientError::RequestBuild(format!("header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
