// Consul registrar - registers a service with the local Consul agent
//
// The registration payload is built once from the environment, then
// submitted up to ten times while the agent comes up.

use tracing::info;

// Re-export member crates
pub use registrar_config;
pub use registrar_discovery;
pub use registrar_http_client;

pub use registrar_config::{RegistrarConfig, load_dotenv};
pub use registrar_discovery::{
    ConsulRegistrar, DiscoveryError, RegistrationRequest, ServiceRegistry, register_with_retry,
};
pub use registrar_http_client::{RetryDriver, Sleeper, TokioSleeper};

/// Printed on standard output once the agent accepts the registration.
pub const SUCCESS_MESSAGE: &str = "Service registered with consul successfully !";

/// Build the registration from `config` and submit it to the local agent.
///
/// Configuration errors are returned before any request is made. Returns
/// the number of attempts the registration took.
pub async fn run<S: Sleeper>(config: &RegistrarConfig, sleeper: S) -> Result<u32, DiscoveryError> {
    let request = RegistrationRequest::build(config)?;
    let consul = ConsulRegistrar::from_config(config)?;

    info!(
        service = request.name(),
        endpoint = consul.endpoint(),
        "Registering service"
    );

    register_with_retry(&consul, &request, &RetryDriver::with_sleeper(sleeper)).await
}

/// Same as [`run`], against an arbitrary registry.
pub async fn run_with_registry<R, S>(
    config: &RegistrarConfig,
    registry: &R,
    driver: &RetryDriver<S>,
) -> Result<u32, DiscoveryError>
where
    R: ServiceRegistry + ?Sized,
    S: Sleeper,
{
    let request = RegistrationRequest::build(config)?;
    register_with_retry(registry, &request, driver).await
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConsulRegistrar, DiscoveryError, RegistrarConfig, RegistrationRequest, RetryDriver,
        SUCCESS_MESSAGE, ServiceRegistry, Sleeper, TokioSleeper, register_with_retry, run,
        run_with_registry,
    };
}
