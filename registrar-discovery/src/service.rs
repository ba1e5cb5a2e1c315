//! Service registration payload and registry seam

use async_trait::async_trait;
use registrar_config::RegistrarConfig;
use registrar_http_client::HttpClientError;
use serde::{Serialize, Serializer};
use std::num::ParseIntError;
use thiserror::Error;
use tracing::debug;

/// Interval Consul uses to poll the health check.
pub const HEALTH_CHECK_INTERVAL: &str = "5s";

/// Service discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("No {field} specified for {}", describe_host(.host))]
    MissingField {
        field: &'static str,
        host: Option<String>,
    },

    #[error("Unable to convert \"{value}\" to int: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Unable to register to consul: {0}")]
    RegistrationFailed(#[source] HttpClientError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DiscoveryError {
    /// Missing-field error naming the local host when it can be resolved.
    pub fn missing(field: &'static str) -> Self {
        let host = hostname::get().ok().and_then(|h| h.into_string().ok());
        Self::MissingField { field, host }
    }

    /// Whether the error was raised before any network activity.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::RegistrationFailed(_))
    }
}

fn describe_host(host: &Option<String>) -> String {
    match host {
        Some(host) => format!("host {host}"),
        None => "this host".to_string(),
    }
}

/// Health check protocols that enable a check in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckType {
    Http,
    Grpc,
}

impl HealthCheckType {
    /// Parse a protocol name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "http" => Some(Self::Http),
            "grpc" => Some(Self::Grpc),
            _ => None,
        }
    }

    /// Protocol name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
        }
    }
}

/// Health check entry of a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckSpec {
    /// URL polled by the agent
    #[serde(rename = "http")]
    pub target: String,

    /// Poll interval
    pub interval: String,
}

impl HealthCheckSpec {
    /// Health check polling `/hostname` on the local agent port.
    ///
    /// The configured endpoint does not appear in the target URL.
    pub fn for_agent(consul_port: &str) -> Self {
        Self {
            target: format!("http://localhost:{consul_port}/hostname"),
            interval: HEALTH_CHECK_INTERVAL.to_string(),
        }
    }
}

/// Registration payload for the agent's `/v1/agent/service/register` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    name: String,
    tags: Vec<String>,
    address: String,
    port: u16,
    #[serde(
        rename = "checks",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_checks"
    )]
    health_check: Option<HealthCheckSpec>,
}

impl RegistrationRequest {
    /// Build the payload from raw configuration.
    ///
    /// Validation order: tags, app port (presence, then parse), consul port.
    /// The service name is not checked and defaults to an empty string.
    pub fn build(config: &RegistrarConfig) -> Result<Self, DiscoveryError> {
        let tags = present(&config.tags).ok_or_else(|| DiscoveryError::missing("tags"))?;

        let raw_port =
            present(&config.app_port).ok_or_else(|| DiscoveryError::missing("app port"))?;
        let port = raw_port
            .parse::<u16>()
            .map_err(|source| DiscoveryError::InvalidPort {
                value: raw_port.to_string(),
                source,
            })?;

        let consul_port =
            present(&config.consul_port).ok_or_else(|| DiscoveryError::missing("consul port"))?;

        let health_check = match (
            present(&config.health_check_type).and_then(HealthCheckType::from_name),
            present(&config.health_check_endpoint),
        ) {
            (Some(kind), Some(endpoint)) => {
                let check = HealthCheckSpec::for_agent(consul_port);
                debug!(
                    protocol = kind.as_str(),
                    endpoint,
                    target = %check.target,
                    "Health check enabled"
                );
                Some(check)
            }
            _ => None,
        };

        Ok(Self {
            name: config.app_name.clone().unwrap_or_default(),
            tags: tags.split(',').map(str::to_string).collect(),
            address: String::new(),
            port,
            health_check,
        })
    }

    /// Service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Advertised address; always empty so the agent fills in its own
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Service port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Health check, if one was configured
    pub fn health_check(&self) -> Option<&HealthCheckSpec> {
        self.health_check.as_ref()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn serialize_checks<S>(check: &Option<HealthCheckSpec>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match check {
        Some(check) => std::slice::from_ref(check).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Registry accepting service registrations
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Submit a registration once. Retrying is up to the caller.
    async fn submit(&self, request: &RegistrationRequest) -> Result<(), HttpClientError>;
}
