//! Bounded-retry registration

use crate::service::{DiscoveryError, RegistrationRequest, ServiceRegistry};
use registrar_http_client::{MAX_ATTEMPTS, RetryDriver, Sleeper};
use tracing::{debug, error, info};

/// Submit `request` until the registry accepts it or the budget runs out.
///
/// Returns the number of attempts used. Every failure, including non-200
/// responses, is retried; after the final failed attempt the last error is
/// returned as [`DiscoveryError::RegistrationFailed`].
pub async fn register_with_retry<R, S>(
    registry: &R,
    request: &RegistrationRequest,
    driver: &RetryDriver<S>,
) -> Result<u32, DiscoveryError>
where
    R: ServiceRegistry + ?Sized,
    S: Sleeper,
{
    let outcome = driver
        .run(move |attempt| {
            debug!(attempt, service = request.name(), "Submitting registration");
            registry.submit(request)
        })
        .await;

    match outcome {
        Ok(report) => {
            info!(
                service = request.name(),
                attempts = report.attempts,
                "Service registered"
            );
            Ok(report.attempts)
        }
        Err(e) => {
            error!(
                service = request.name(),
                attempts = MAX_ATTEMPTS,
                error = %e,
                "Giving up on registration"
            );
            Err(DiscoveryError::RegistrationFailed(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRegistry;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use registrar_config::RegistrarConfig;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct RecordingSleeper {
        sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().push(duration);
        }
    }

    fn request() -> RegistrationRequest {
        let config = RegistrarConfig::new()
            .with_app_name("asr")
            .with_app_port("5001")
            .with_tags("svc1")
            .with_consul_port("8500");
        RegistrationRequest::build(&config).unwrap()
    }

    #[tokio::test]
    async fn test_registers_on_first_attempt() {
        let registry = InMemoryRegistry::new();
        let sleeper = RecordingSleeper::default();
        let driver = RetryDriver::with_sleeper(sleeper.clone());

        let attempts = register_with_retry(&registry, &request(), &driver)
            .await
            .unwrap();

        assert_eq!(attempts, 1);
        assert!(sleeper.sleeps.lock().is_empty());
        assert!(registry.get("asr").await.is_some());
    }

    #[tokio::test]
    async fn test_registers_after_agent_starts() {
        let registry = InMemoryRegistry::new().unavailable_for(5);
        let sleeper = RecordingSleeper::default();
        let driver = RetryDriver::with_sleeper(sleeper.clone());

        let attempts = register_with_retry(&registry, &request(), &driver)
            .await
            .unwrap();

        assert_eq!(attempts, 6);
        assert_eq!(sleeper.sleeps.lock().len(), 5);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let registry = InMemoryRegistry::new().unavailable_for(MAX_ATTEMPTS);
        let sleeper = RecordingSleeper::default();
        let driver = RetryDriver::with_sleeper(sleeper.clone());

        let err = register_with_retry(&registry, &request(), &driver)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::RegistrationFailed(_)));
        assert!(!err.is_configuration_error());
        assert_eq!(registry.submissions(), MAX_ATTEMPTS);
        assert_eq!(sleeper.sleeps.lock().len(), 9);
        assert_eq!(registry.count().await, 0);
    }
}
