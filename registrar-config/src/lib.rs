// Configuration loading for consul-registrar

pub mod env;
pub mod error;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the service name.
pub const APP_NAME: &str = "APP_NAME";
/// Environment variable holding the service port.
pub const APP_PORT: &str = "APP_PORT";
/// Environment variable holding the comma-separated tag list.
pub const TAGS: &str = "TAGS";
/// Environment variable holding the local Consul agent port.
pub const CONSUL_PORT: &str = "CONSUL_PORT";
/// Environment variable holding the health check protocol (`http` or `grpc`).
pub const HEALTH_CHECK_TYPE: &str = "HEALTH_CHECK_TYPE";
/// Environment variable holding the health check endpoint.
pub const HEALTH_CHECK_ENDPOINT: &str = "HEALTH_CHECK_ENDPOINT";

/// Raw registration inputs, read once at startup.
///
/// Values are kept exactly as supplied; validation happens when the
/// registration payload is built. Empty values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrarConfig {
    pub app_name: Option<String>,
    pub app_port: Option<String>,
    pub tags: Option<String>,
    pub consul_port: Option<String>,
    pub health_check_type: Option<String>,
    pub health_check_endpoint: Option<String>,
}

impl RegistrarConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_loader(&EnvLoader::default())
    }

    /// Read the configuration through an environment loader
    pub fn from_loader(loader: &EnvLoader) -> Self {
        Self::from_lookup(|key| loader.optional(key))
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let config = Self {
            app_name: read(APP_NAME),
            app_port: read(APP_PORT),
            tags: read(TAGS),
            consul_port: read(CONSUL_PORT),
            health_check_type: read(HEALTH_CHECK_TYPE),
            health_check_endpoint: read(HEALTH_CHECK_ENDPOINT),
        };

        debug!(
            app_name = ?config.app_name,
            app_port = ?config.app_port,
            consul_port = ?config.consul_port,
            health_check_type = ?config.health_check_type,
            "Configuration loaded"
        );

        config
    }

    /// Set the service name
    pub fn with_app_name(mut self, value: impl Into<String>) -> Self {
        self.app_name = Some(value.into());
        self
    }

    /// Set the service port
    pub fn with_app_port(mut self, value: impl Into<String>) -> Self {
        self.app_port = Some(value.into());
        self
    }

    /// Set the comma-separated tag list
    pub fn with_tags(mut self, value: impl Into<String>) -> Self {
        self.tags = Some(value.into());
        self
    }

    /// Set the Consul agent port
    pub fn with_consul_port(mut self, value: impl Into<String>) -> Self {
        self.consul_port = Some(value.into());
        self
    }

    /// Set the health check protocol and endpoint
    pub fn with_health_check(
        mut self,
        check_type: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        self.health_check_type = Some(check_type.into());
        self.health_check_endpoint = Some(endpoint.into());
        self
    }
}

/// Load a `.env` file into the process environment.
///
/// Without a path, a missing `.env` in the working directory is ignored, but
/// one that exists and cannot be parsed is an error. An explicit path that
/// cannot be read is an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| {
                ConfigError::LoadError(format!("{}: {}", path.display(), e))
            })?;
            debug!(path = %path.display(), "Loaded environment file");
        }
        None => {
            if let Some(path) = skip_missing(dotenvy::dotenv())? {
                debug!(path = %path.display(), "Loaded environment file");
            }
        }
    }
    Ok(())
}

fn skip_missing(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => {
            debug!("No .env file found");
            Ok(None)
        }
        Err(e) => Err(ConfigError::LoadError(format!(".env: {e}"))),
    }
}
