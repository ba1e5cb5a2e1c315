//! Integration tests for Consul registration against a mock agent.

use registrar_config::RegistrarConfig;
use registrar_discovery::*;
use registrar_http_client::{HttpClientError, MAX_ATTEMPTS, RetryDriver, Sleeper};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default, Clone)]
struct CountingSleeper {
    sleeps: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}

fn config() -> RegistrarConfig {
    RegistrarConfig::new()
        .with_app_name("asr")
        .with_app_port("5001")
        .with_tags("svc1,en")
        .with_consul_port("8500")
        .with_health_check("grpc", "/grpc.health.v1.Health/Check")
}

#[tokio::test]
async fn test_submit_sends_consul_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(REGISTER_PATH))
        .and(header("accept", "application/json"))
        .and(body_json(serde_json::json!({
            "name": "asr",
            "tags": ["svc1", "en"],
            "address": "",
            "port": 5001,
            "checks": [{"http": "http://localhost:8500/hostname", "interval": "5s"}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let consul = ConsulRegistrar::new(server.uri()).unwrap();
    let request = RegistrationRequest::build(&config()).unwrap();

    consul.submit(&request).await.unwrap();
}

#[tokio::test]
async fn test_submit_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid check"))
        .mount(&server)
        .await;

    let consul = ConsulRegistrar::new(server.uri()).unwrap();
    let request = RegistrationRequest::build(&config()).unwrap();

    match consul.submit(&request).await.unwrap_err() {
        HttpClientError::Response { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Invalid check");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_retry_until_agent_returns_200() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(2)
        .mount(&server)
        .await;

    let consul = ConsulRegistrar::new(server.uri()).unwrap();
    let request = RegistrationRequest::build(&config()).unwrap();
    let sleeper = CountingSleeper::default();
    let driver = RetryDriver::with_sleeper(sleeper.clone());

    let attempts = register_with_retry(&consul, &request, &driver).await.unwrap();

    assert_eq!(attempts, 4);
    assert_eq!(sleeper.sleeps.load(Ordering::SeqCst), 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_rejection_is_retried_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid service"))
        .mount(&server)
        .await;

    let consul = ConsulRegistrar::new(server.uri()).unwrap();
    let request = RegistrationRequest::build(&config()).unwrap();
    let sleeper = CountingSleeper::default();
    let driver = RetryDriver::with_sleeper(sleeper.clone());

    let err = register_with_retry(&consul, &request, &driver)
        .await
        .unwrap_err();

    assert_eq!(
        server.received_requests().await.unwrap().len(),
        MAX_ATTEMPTS as usize
    );
    assert_eq!(sleeper.sleeps.load(Ordering::SeqCst), 9);
    assert!(err.to_string().contains("Invalid service"));
}
