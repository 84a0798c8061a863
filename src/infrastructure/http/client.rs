//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::domain::errors::TransportError;
use crate::domain::ports::TransportPort;

/// Downloads resources over HTTP(S).
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given user agent and request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    fn request_error(url: &Url, e: &reqwest::Error) -> TransportError {
        warn!(url = %url, error = %e, "Request failed");
        if e.is_timeout() {
            TransportError::unreachable("request timed out")
        } else if e.is_connect() {
            TransportError::unreachable(format!("failed to connect to {}", url.host_str().unwrap_or("host")))
        } else {
            TransportError::unreachable(e.to_string())
        }
    }
}

/// Maps a non-success status to a transport error.
fn status_error(status: StatusCode) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
    }
}

#[async_trait]
impl TransportPort for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Bytes, TransportError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %url,
                status = %status,
                reason = status.canonical_reason().unwrap_or("Unknown"),
                "Server refused request"
            );
            return Err(status_error(status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::request_error(url, &e))?;

        debug!(url = %url, len = bytes.len(), "Downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::NetworkError;
    use test_case::test_case;

    #[test]
    fn test_client_creation() {
        let transport = HttpTransport::new("photofeed-test", Duration::from_secs(5));
        assert!(transport.is_ok());
    }

    #[test_case(StatusCode::NOT_FOUND, 404 ; "not_found")]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR, 500 ; "server_error")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE, 503 ; "unavailable")]
    fn test_status_error(status: StatusCode, expected: u16) {
        let error = status_error(status);

        assert_eq!(error, TransportError::Status { status: expected });
        assert_eq!(NetworkError::from(error), NetworkError::InvalidResponse);
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_no_connection() {
        let transport = HttpTransport::new("photofeed-test", Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/feed.json").unwrap();

        let error = transport.fetch(&url).await.unwrap_err();

        assert!(matches!(error, TransportError::Unreachable { .. }));
        assert_eq!(NetworkError::from(error), NetworkError::NoConnection);
    }
}
