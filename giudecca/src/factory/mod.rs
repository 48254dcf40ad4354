//! Factory entities and their hydration from feature records.
//!
//! A [`Factory`] is read from the attributes of one feature record and then
//! hydrated by the [`Hydrator`] through per-entity lookups against the
//! feature service: object id, location (projected onto the map), and on
//! demand the attachment (image) listing.

mod entity;
mod hydrator;

pub use entity::{Factory, FactoryKeys, GeoLocation, Language};
pub use hydrator::{
    log_failures, HydrationError, HydrationFailure, HydrationReport, Hydrator, ImageReport,
    DEFAULT_MAX_CONCURRENT_LOOKUPS,
};
