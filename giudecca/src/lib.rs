//! Giudecca - industrial-heritage map core
//!
//! Client and domain logic behind the map and timeline of the industrial
//! sites on the Giudecca island in Venice: a hosted feature-service client,
//! the projection placing factories on the map image, factory hydration,
//! and the client-side filters of the data explorer.
//!
//! # High-Level API
//!
//! ```ignore
//! use giudecca::factory::Hydrator;
//! use giudecca::service::{AsyncReqwestClient, FeatureLayerClient};
//!
//! let client = FeatureLayerClient::new(AsyncReqwestClient::new()?).with_api_token(token);
//! let hydrator = Hydrator::new(client);
//!
//! // Factories with their map positions resolved
//! let report = hydrator.try_fetch_factories(endpoint, None).await?;
//! ```

pub mod config;
pub mod coord;
pub mod factory;
pub mod feature;
pub mod filter;
pub mod logging;
pub mod service;
pub mod timeline;

/// Version of the Giudecca library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
