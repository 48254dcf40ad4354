//! Feature-service client
//!
//! Queries hosted feature layers (ArcGIS REST style) for feature records,
//! per-feature locations and attachment listings.
//!
//! ```ignore
//! use giudecca::service::{AsyncReqwestClient, FeatureLayerClient};
//!
//! let client = FeatureLayerClient::new(AsyncReqwestClient::new()?).with_api_token(token);
//! let features = client.query_features(endpoint, Some("Opening_Year < 1900")).await?;
//! ```

mod client;
mod error;
mod http;

pub use client::{attachment_url, FeatureLayerClient, FeatureQuery, MATCH_ALL};
pub use error::ServiceError;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};

pub(crate) use http::strip_query;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
