//! Hydration of feature records into `Factory` entities.
//!
//! Each record needs two dependent lookups (object id, then location) and,
//! for images, one more (attachment listing). Records are hydrated
//! independently and joined explicitly: the aggregate completes when the
//! slowest lookup does, and every per-entity failure is reported next to
//! the successes instead of being dropped.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::entity::{Factory, FactoryKeys};
use crate::coord::MapBounds;
use crate::feature::FeatureRecord;
use crate::service::{strip_query, AsyncHttpClient, FeatureLayerClient, ServiceError};

/// Default number of entities hydrated at the same time.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Errors that can occur while hydrating one entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HydrationError {
    /// Record lacks an attribute hydration cannot proceed without
    #[error("Record has no '{key}' attribute")]
    MissingAttribute { key: String },

    /// Identifier lookup found no feature
    #[error("No feature found for factory {factory_id}")]
    ObjectNotFound { factory_id: i64 },

    /// Lookup request failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// One entity that could not be hydrated.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationFailure {
    /// Factory id, if the record had one
    pub factory_id: Option<i64>,
    pub error: HydrationError,
}

/// Outcome of hydrating a batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrationReport {
    /// Hydrated factories, in input order
    pub factories: Vec<Factory>,
    pub failures: Vec<HydrationFailure>,
}

impl HydrationReport {
    /// True when every record was hydrated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of collecting the images of every factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageReport {
    /// Attachment URLs keyed by factory id
    pub images: BTreeMap<i64, Vec<String>>,
    pub failures: Vec<HydrationFailure>,
}

/// Turns feature records of a factories layer into `Factory` entities.
pub struct Hydrator<C: AsyncHttpClient> {
    client: FeatureLayerClient<C>,
    keys: FactoryKeys,
    bounds: MapBounds,
    max_concurrent: usize,
}

impl<C: AsyncHttpClient> Hydrator<C> {
    /// Creates a hydrator with default attribute keys and map bounds.
    pub fn new(client: FeatureLayerClient<C>) -> Self {
        Self {
            client,
            keys: FactoryKeys::default(),
            bounds: MapBounds::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    pub fn with_keys(mut self, keys: FactoryKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_bounds(mut self, bounds: MapBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set how many entities are hydrated at the same time (at least 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// The underlying feature-layer client.
    pub fn client(&self) -> &FeatureLayerClient<C> {
        &self.client
    }

    /// Hydrates a single record.
    ///
    /// A record whose location cannot be found still hydrates, with
    /// `location` and `position` left as `None`.
    pub async fn hydrate(
        &self,
        endpoint: &str,
        record: &FeatureRecord,
    ) -> Result<Factory, HydrationError> {
        let mut factory = Factory::from_record(record, &self.keys)?;

        let object_id = self
            .client
            .resolve_object_id(
                endpoint,
                &self.keys.object_id,
                &self.keys.factory_id,
                factory.factory_id,
            )
            .await?
            .ok_or(HydrationError::ObjectNotFound {
                factory_id: factory.factory_id,
            })?;
        factory.object_id = Some(object_id);

        let location = self
            .client
            .fetch_location(
                endpoint,
                object_id,
                &self.keys.latitude,
                &self.keys.longitude,
            )
            .await?;

        match location {
            Some((lat, lon)) => factory.set_location(lat, lon, &self.bounds),
            None => debug!(
                factory_id = factory.factory_id,
                object_id, "Factory has no coordinates, leaving position undefined"
            ),
        }

        Ok(factory)
    }

    /// Hydrates every record, concurrently.
    pub async fn hydrate_all(&self, endpoint: &str, records: &[FeatureRecord]) -> HydrationReport {
        let outcomes: Vec<_> = stream::iter(records)
            .map(|record| async move { (record, self.hydrate(endpoint, record).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut report = HydrationReport::default();
        for (record, outcome) in outcomes {
            match outcome {
                Ok(factory) => report.factories.push(factory),
                Err(error) => report.failures.push(HydrationFailure {
                    factory_id: record.integer(&self.keys.factory_id),
                    error,
                }),
            }
        }

        debug!(
            endpoint = strip_query(endpoint),
            hydrated = report.factories.len(),
            failed = report.failures.len(),
            "Hydration completed"
        );
        report
    }

    /// Fetches the features matching `predicate` and hydrates them.
    ///
    /// Fails only if the initial query fails; per-entity failures are in the
    /// report.
    pub async fn try_fetch_factories(
        &self,
        endpoint: &str,
        predicate: Option<&str>,
    ) -> Result<HydrationReport, ServiceError> {
        let records = self.client.query_features(endpoint, predicate).await?;
        Ok(self.hydrate_all(endpoint, &records).await)
    }

    /// Like [`try_fetch_factories`](Self::try_fetch_factories), but logs
    /// every failure and returns only the hydrated factories.
    ///
    /// A failed query yields an empty list.
    pub async fn fetch_factories(&self, endpoint: &str, predicate: Option<&str>) -> Vec<Factory> {
        match self.try_fetch_factories(endpoint, predicate).await {
            Ok(report) => {
                log_failures(&report.failures);
                report.factories
            }
            Err(e) => {
                warn!(
                    endpoint = strip_query(endpoint),
                    error = %e,
                    "Error fetching factories, returning empty list"
                );
                Vec::new()
            }
        }
    }

    /// Lists the image URLs of one factory.
    ///
    /// Resolves the object id first if the factory does not carry one.
    pub async fn factory_images(
        &self,
        endpoint: &str,
        factory: &Factory,
    ) -> Result<Vec<String>, HydrationError> {
        let object_id = match factory.object_id {
            Some(id) => id,
            None => self
                .client
                .resolve_object_id(
                    endpoint,
                    &self.keys.object_id,
                    &self.keys.factory_id,
                    factory.factory_id,
                )
                .await?
                .ok_or(HydrationError::ObjectNotFound {
                    factory_id: factory.factory_id,
                })?,
        };

        Ok(self.client.fetch_attachment_urls(endpoint, object_id).await?)
    }

    /// Collects the image URLs of every factory in the layer.
    ///
    /// Hydration failures and attachment failures both end up in
    /// `failures`; a factory without attachments maps to an empty list.
    pub async fn fetch_all_factory_images(&self, endpoint: &str) -> Result<ImageReport, ServiceError> {
        let hydrated = self.try_fetch_factories(endpoint, None).await?;

        if hydrated.factories.is_empty() {
            warn!(
                endpoint = strip_query(endpoint),
                "No factories retrieved"
            );
        }

        let outcomes: Vec<_> = stream::iter(&hydrated.factories)
            .map(|factory| async move { (factory.factory_id, self.factory_images(endpoint, factory).await) })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut report = ImageReport {
            images: BTreeMap::new(),
            failures: hydrated.failures,
        };
        for (factory_id, outcome) in outcomes {
            match outcome {
                Ok(urls) => {
                    if report.images.insert(factory_id, urls).is_some() {
                        warn!(factory_id, "Duplicate factory id in layer, keeping one image list");
                    }
                }
                Err(error) => report.failures.push(HydrationFailure {
                    factory_id: Some(factory_id),
                    error,
                }),
            }
        }

        info!(
            factories = report.images.len(),
            images = report.images.values().map(Vec::len).sum::<usize>(),
            failed = report.failures.len(),
            "Factory images collected"
        );
        Ok(report)
    }
}

/// Logs each hydration failure at warn level.
pub fn log_failures(failures: &[HydrationFailure]) {
    for failure in failures {
        warn!(
            factory_id = ?failure.factory_id,
            error = %failure.error,
            "Factory could not be hydrated"
        );
    }
}
