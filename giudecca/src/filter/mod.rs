//! Client-side filters for the data explorer.
//!
//! The filters run over feature records that were already fetched with
//! [`FeatureLayerClient::query_features`](crate::service::FeatureLayerClient::query_features);
//! no hydration is needed.

mod attribute;
mod relational;

pub use attribute::{
    filter_by_date_range, filter_by_dual_range, filter_by_substring, AttributeMatch, DualRange,
};
pub use relational::RelationalFilters;
