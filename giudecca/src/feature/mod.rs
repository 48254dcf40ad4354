//! Feature records: the flat attribute maps returned by feature-layer queries.

mod types;

pub use types::{AttachmentInfo, AttributeValue, FeatureRecord, Geometry, OBJECT_ID_KEY};

pub(crate) use types::{AttachmentsResponse, QueryResponse, RemoteError};
