//! Feature record types as returned by the feature service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute key holding the service-internal object identifier.
pub const OBJECT_ID_KEY: &str = "OBJECTID";

/// A primitive attribute value.
///
/// Feature services only ever return flat scalars for attributes; dates stored
/// as years may come back either as numbers or as numeric text depending on
/// how the layer was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Returns the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, parsing numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) if !f.is_nan() => Some(*f),
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            _ => None,
        }
    }

    /// Returns the value as a whole number.
    ///
    /// Floats are accepted only when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            AttributeValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose equality against a textual value.
    ///
    /// Numbers compare numerically when `value` parses as a number, so
    /// `Integer(1)` matches `"1"` and `"1.0"`.
    pub fn matches_text(&self, value: &str) -> bool {
        match (self.as_f64(), value.trim().parse::<f64>()) {
            (Some(a), Ok(b)) if !matches!(self, AttributeValue::Text(_)) => a == b,
            _ => self.to_string() == value,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Point geometry in the spatial reference requested from the service.
///
/// With `outSR=4326`, `x` is longitude and `y` is latitude. Polygon or
/// polyline geometries deserialize with both fields absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub y: Option<f64>,
}

/// Empty points come back as `null` or as the text `"NaN"`; both read as
/// `None`, as does any other non-numeric value.
fn deserialize_coordinate<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(d)?;
    let coordinate = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(coordinate.filter(|c| c.is_finite()))
}

impl Geometry {
    /// Returns `(lat, lon)` if the geometry is a valid point.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match (self.y, self.x) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// One feature as returned by a feature-layer query.
///
/// Immutable once fetched; filters and hydration only read from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl FeatureRecord {
    /// Creates a record from attribute pairs, without geometry.
    pub fn from_attributes<K, V, I>(attributes: I) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            geometry: None,
        }
    }

    /// Returns a non-null attribute value.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Returns a text attribute.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(AttributeValue::as_str)
    }

    /// Returns a numeric attribute.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.attribute(key).and_then(AttributeValue::as_f64)
    }

    /// Returns a whole-number attribute.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.attribute(key).and_then(AttributeValue::as_i64)
    }

    /// Service-internal object identifier.
    pub fn object_id(&self) -> Option<i64> {
        self.integer(OBJECT_ID_KEY)
    }
}

/// Top-level body of a `query` response.
///
/// Feature services report failures with HTTP 200 and an `error` object, so
/// both shapes are accepted here and told apart by the caller.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

/// Error object embedded in a service response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One entry of an attachment listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content_type: String,
}

/// Body of an `{oid}/attachments` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttachmentsResponse {
    #[serde(default)]
    pub attachment_infos: Vec<AttachmentInfo>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}
