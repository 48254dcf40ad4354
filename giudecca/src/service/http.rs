//! HTTP client abstraction for testability

use super::error::ServiceError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP client operations.
///
/// Allows the feature-layer client to be driven by a mock in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, including its query string
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ServiceError>> + Send;
}

/// Returns the URL without its query string.
///
/// Query strings carry the API token, so only this part is ever logged or
/// put into errors.
pub(crate) fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    ///
    /// The timeout applies to each request on its own.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("giudecca/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ServiceError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let endpoint = strip_query(url);
        trace!(url = endpoint, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = endpoint,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                let e = e.without_url();
                warn!(
                    url = endpoint,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ServiceError::Http(e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!(
                url = endpoint,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ServiceError::Status {
                status: response.status().as_u16(),
                url: endpoint.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = endpoint, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                let e = e.without_url();
                warn!(url = endpoint, error = %e, "Failed to read response body");
                Err(ServiceError::Http(format!("Failed to read response: {}", e)))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock async HTTP client for testing.
    ///
    /// Answers with the response of the first route whose pattern is a
    /// substring of the requested URL, or with `fallback` if none matches.
    /// Every requested URL is recorded.
    pub struct MockAsyncHttpClient {
        routes: Vec<(String, Result<Vec<u8>, ServiceError>)>,
        fallback: Result<Vec<u8>, ServiceError>,
        requests: Mutex<Vec<String>>,
    }

    impl MockAsyncHttpClient {
        /// Mock answering every request with the same response.
        pub fn with_response(response: Result<Vec<u8>, ServiceError>) -> Self {
            Self {
                routes: Vec::new(),
                fallback: response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Mock answering every request with a transport failure.
        pub fn failing() -> Self {
            Self::with_response(Err(ServiceError::Http("connection refused".to_string())))
        }

        /// Adds a route answering with a JSON body.
        pub fn route_json(mut self, pattern: &str, body: serde_json::Value) -> Self {
            self.routes
                .push((pattern.to_string(), Ok(body.to_string().into_bytes())));
            self
        }

        /// Adds a route answering with an error.
        pub fn route_error(mut self, pattern: &str, error: ServiceError) -> Self {
            self.routes.push((pattern.to_string(), Err(error)));
            self
        }

        /// URLs requested so far, in request order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    #[tokio::test]
    async fn test_mock_async_client_success() {
        let mock = MockAsyncHttpClient::with_response(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com").await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_mock_async_client_error() {
        let mock = MockAsyncHttpClient::failing();

        let result = mock.get("http://example.com").await;
        assert!(matches!(result.unwrap_err(), ServiceError::Http(_)));
    }

    #[tokio::test]
    async fn test_mock_routes_first_match() {
        let mock = MockAsyncHttpClient::failing()
            .route_json("/attachments", serde_json::json!({ "attachmentInfos": [] }))
            .route_json("/query", serde_json::json!({ "features": [] }));

        let body = mock.get("http://host/layer/0/query?f=json").await.unwrap();
        assert_eq!(body, br#"{"features":[]}"#.to_vec());
        assert!(mock.get("http://host/other").await.is_err());
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_strip_query_hides_token() {
        assert_eq!(
            strip_query("https://host/FeatureServer/0/query?where=1%3D1&token=secret"),
            "https://host/FeatureServer/0/query"
        );
        assert_eq!(strip_query("https://host/path"), "https://host/path");
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}
