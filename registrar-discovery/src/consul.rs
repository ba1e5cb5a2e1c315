//! Consul agent registration

use crate::service::{DiscoveryError, RegistrationRequest, ServiceRegistry};
use async_trait::async_trait;
use registrar_config::RegistrarConfig;
use registrar_http_client::{HttpClient, HttpClientConfig, HttpClientError};
use tracing::debug;

/// Path of the agent's service registration endpoint
pub const REGISTER_PATH: &str = "/v1/agent/service/register";

/// Registers services with a Consul agent over its HTTP API
pub struct ConsulRegistrar {
    endpoint: String,
    client: HttpClient,
}

impl ConsulRegistrar {
    /// Create a registrar for the agent at `base_url`
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use registrar_discovery::ConsulRegistrar;
    ///
    /// let consul = ConsulRegistrar::new("http://localhost:8500")?;
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self, DiscoveryError> {
        let client = HttpClient::new(HttpClientConfig::default())
            .map_err(|e| DiscoveryError::InvalidConfiguration(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a registrar with a preconfigured HTTP client
    pub fn with_client(base_url: impl Into<String>, client: HttpClient) -> Self {
        let base_url = base_url.into();
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), REGISTER_PATH),
            client,
        }
    }

    /// Create a registrar for the agent listening on `localhost:<consul_port>`
    pub fn local_agent(consul_port: &str) -> Result<Self, DiscoveryError> {
        Self::new(format!("http://localhost:{consul_port}"))
    }

    /// Create a registrar for the agent port named in the configuration
    pub fn from_config(config: &RegistrarConfig) -> Result<Self, DiscoveryError> {
        let consul_port = config
            .consul_port
            .as_deref()
            .filter(|port| !port.is_empty())
            .ok_or_else(|| DiscoveryError::missing("consul port"))?;
        Self::local_agent(consul_port)
    }

    /// Full registration URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ServiceRegistry for ConsulRegistrar {
    async fn submit(&self, request: &RegistrationRequest) -> Result<(), HttpClientError> {
        let response = self
            .client
            .put_json(&self.endpoint, request)
            .await?
            .require_ok()?;

        debug!(
            endpoint = %self.endpoint,
            service = request.name(),
            status = %response.status(),
            "Consul accepted registration"
        );
        Ok(())
    }
}
