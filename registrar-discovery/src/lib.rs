//! Service registration for Consul agents
//!
//! This crate builds the registration payload from raw configuration and
//! submits it to the local agent, retrying while the agent is unavailable.
//!
//! ## Features
//!
//! - **Payload building** - Validated [`RegistrationRequest`] from [`RegistrarConfig`](registrar_config::RegistrarConfig)
//! - **Consul submission** - One `PUT /v1/agent/service/register` per attempt
//! - **Bounded retry** - Ten attempts, one second apart
//! - **In-memory registry** - For tests and local development
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use registrar_config::RegistrarConfig;
//! use registrar_discovery::*;
//! use registrar_http_client::RetryDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistrarConfig::from_env();
//!     let request = RegistrationRequest::build(&config)?;
//!     let consul = ConsulRegistrar::from_config(&config)?;
//!
//!     let attempts = register_with_retry(&consul, &request, &RetryDriver::new()).await?;
//!     println!("Registered after {attempts} attempts");
//!
//!     Ok(())
//! }
//! ```

pub mod consul;
pub mod memory;
pub mod registration;
pub mod service;

pub use consul::{ConsulRegistrar, REGISTER_PATH};
pub use memory::InMemoryRegistry;
pub use registration::register_with_retry;
pub use service::{
    DiscoveryError, HEALTH_CHECK_INTERVAL, HealthCheckSpec, HealthCheckType,
    RegistrationRequest, ServiceRegistry,
};
