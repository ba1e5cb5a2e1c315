//! In-memory service registry (for testing)

use crate::service::{RegistrationRequest, ServiceRegistry};
use async_trait::async_trait;
use registrar_http_client::HttpClientError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

/// In-memory registry (for testing/development)
///
/// Registrations are keyed by service name, so resubmitting the same
/// payload is an upsert just like on a real agent. The registry can be made
/// to reject a number of submissions first, imitating an agent that is
/// still starting.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    services: Arc<RwLock<HashMap<String, RegistrationRequest>>>,
    unavailable_for: Arc<AtomicU32>,
    submissions: Arc<AtomicU32>,
}

impl InMemoryRegistry {
    /// Create new in-memory registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `attempts` submissions with a connection error
    pub fn unavailable_for(self, attempts: u32) -> Self {
        self.unavailable_for.store(attempts, Ordering::SeqCst);
        self
    }

    /// Total submissions received, accepted or not
    pub fn submissions(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Look up a registration by service name
    pub async fn get(&self, name: &str) -> Option<RegistrationRequest> {
        self.services.read().await.get(name).cloned()
    }

    /// Get count of registered services
    pub async fn count(&self) -> usize {
        self.services.read().await.len()
    }
}

#[async_trait]
impl ServiceRegistry for InMemoryRegistry {
    async fn submit(&self, request: &RegistrationRequest) -> Result<(), HttpClientError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        let rejected = self
            .unavailable_for
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(HttpClientError::Connection(
                "registry unavailable".to_string(),
            ));
        }

        self.services
            .write()
            .await
            .insert(request.name().to_string(), request.clone());
        Ok(())
    }
}
