//! HTTP response wrapper.

use crate::{HttpClientError, Result};
use bytes::Bytes;
use http::StatusCode;

/// HTTP response with its body fully read.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    body: Bytes,
}

impl Response {
    /// Read a reqwest response to completion.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> reqwest::Result<Self> {
        let status = response.status();
        let body = response.bytes().await?;

        Ok(Self { status, body })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the status is exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn any status other than 200 into an error carrying the body.
    pub fn require_ok(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(HttpClientError::Response {
                status: self.status.as_u16(),
                body: self.text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_only_200_is_ok() {
        assert!(response(200, "").is_ok());
        assert!(!response(201, "").is_ok());
        assert!(!response(204, "").is_ok());
        assert!(response(200, "").require_ok().is_ok());
    }

    #[test]
    fn test_require_ok_carries_body() {
        let err = response(500, "agent not ready").require_ok().unwrap_err();
        match err {
            HttpClientError::Response { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "agent not ready");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
