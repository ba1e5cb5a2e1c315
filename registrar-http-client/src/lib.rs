//! # Registrar HTTP Client
//!
//! Single-attempt HTTP transport and the fixed-budget retry driver used to
//! register a service with a local agent that may still be starting.
//!
//! ## Features
//!
//! - **One round trip per call**: [`HttpClient::put_json`] never retries on its own
//! - **Per-attempt timeout**: 21 seconds by default
//! - **Uniform classification**: every transport failure and every non-200
//!   response is a retryable [`HttpClientError`]
//! - **Fixed retry budget**: [`MAX_ATTEMPTS`] attempts, [`RETRY_DELAY`] apart
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registrar_http_client::{HttpClient, RetryDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::default_client()?;
//!     let driver = RetryDriver::new();
//!     let client = &client;
//!     let url = "http://localhost:8500/v1/agent/service/register";
//!
//!     let report = driver
//!         .run(move |_| async move {
//!             client
//!                 .put_json(url, &serde_json::json!({"name": "api"}))
//!                 .await?
//!                 .require_ok()
//!         })
//!         .await?;
//!
//!     println!("Registered after {} attempts", report.attempts);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod response;
mod retry;

pub use client::HttpClient;
pub use config::{DEFAULT_TIMEOUT, HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use response::Response;
pub use retry::{
    MAX_ATTEMPTS, RETRY_DELAY, RetryDriver, RetryPhase, RetryReport, RetryState, Sleeper,
    TokioSleeper,
};

// Re-export common types
pub use bytes::Bytes;
pub use http::StatusCode;
