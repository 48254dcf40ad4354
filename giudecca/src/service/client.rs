//! Feature-layer query client.

use super::error::ServiceError;
use super::http::{strip_query, AsyncHttpClient};
use crate::feature::{AttachmentInfo, AttachmentsResponse, FeatureRecord, QueryResponse};
use reqwest::Url;
use tracing::{debug, warn};

/// Predicate matching every feature.
pub const MATCH_ALL: &str = "1=1";

/// Spatial reference for returned geometries (WGS84 lat/long).
const OUT_SPATIAL_REFERENCE: &str = "4326";

/// Parameters of a single `query` request.
///
/// # Example
///
/// ```
/// use giudecca::service::FeatureQuery;
///
/// let query = FeatureQuery::new()
///     .with_where("Opening_Year > 1900")
///     .with_out_fields(["Factory_ID", "English_Name"]);
/// assert_eq!(query.where_clause(), "Opening_Year > 1900");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    where_clause: String,
    out_fields: Vec<String>,
    object_ids: Vec<i64>,
    return_geometry: bool,
}

impl FeatureQuery {
    /// Query for every attribute of every feature, without geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the query with a server-evaluated predicate.
    pub fn with_where(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = predicate.into();
        self
    }

    /// Only return the named attributes.
    pub fn with_out_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Only return the features with these object ids.
    pub fn with_object_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.object_ids = ids.into_iter().collect();
        self
    }

    /// Include point geometry (as WGS84 lat/long) in the response.
    pub fn with_geometry(mut self, return_geometry: bool) -> Self {
        self.return_geometry = return_geometry;
        self
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let out_fields = if self.out_fields.is_empty() {
            "*".to_string()
        } else {
            self.out_fields.join(",")
        };

        let mut params = vec![
            ("where", self.where_clause.clone()),
            ("outFields", out_fields),
            ("returnGeometry", self.return_geometry.to_string()),
        ];
        if !self.object_ids.is_empty() {
            let ids: Vec<String> = self.object_ids.iter().map(i64::to_string).collect();
            params.push(("objectIds", ids.join(",")));
        }
        if self.return_geometry {
            params.push(("outSR", OUT_SPATIAL_REFERENCE.to_string()));
        }
        params
    }
}

impl Default for FeatureQuery {
    fn default() -> Self {
        Self {
            where_clause: MATCH_ALL.to_string(),
            out_fields: Vec::new(),
            object_ids: Vec::new(),
            return_geometry: false,
        }
    }
}

/// Client for a hosted feature service.
///
/// Each method issues exactly one request; there is no pagination and no
/// retry. The API token is passed through opaquely as the `token` query
/// parameter and never logged.
pub struct FeatureLayerClient<C: AsyncHttpClient> {
    http: C,
    api_token: Option<String>,
}

impl<C: AsyncHttpClient> FeatureLayerClient<C> {
    /// Creates a client for public layers.
    pub fn new(http: C) -> Self {
        Self {
            http,
            api_token: None,
        }
    }

    /// Sets the API token sent with every request.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Runs a query against `{endpoint}/query`.
    pub async fn query(
        &self,
        endpoint: &str,
        query: &FeatureQuery,
    ) -> Result<Vec<FeatureRecord>, ServiceError> {
        let url = self.request_url(endpoint, "query", &query.to_params())?;
        let body = self.http.get(url.as_str()).await?;

        let response: QueryResponse = serde_json::from_slice(&body)?;
        if let Some(error) = response.error {
            return Err(error.into());
        }

        debug!(
            endpoint = strip_query(endpoint),
            predicate = query.where_clause(),
            features = response.features.len(),
            "Feature query completed"
        );
        Ok(response.features)
    }

    /// Fetches every attribute of the features matching `predicate`.
    ///
    /// `None` matches all features.
    pub async fn query_features(
        &self,
        endpoint: &str,
        predicate: Option<&str>,
    ) -> Result<Vec<FeatureRecord>, ServiceError> {
        let query = FeatureQuery::new().with_where(predicate.unwrap_or(MATCH_ALL));
        self.query(endpoint, &query).await
    }

    /// Like [`query_features`](Self::query_features), but logs failures and
    /// returns an empty list instead.
    ///
    /// Callers cannot tell "no matches" from "request failed"; use
    /// `query_features` when that matters.
    pub async fn fetch_features(&self, endpoint: &str, predicate: Option<&str>) -> Vec<FeatureRecord> {
        match self.query_features(endpoint, predicate).await {
            Ok(features) => features,
            Err(e) => {
                warn!(
                    endpoint = strip_query(endpoint),
                    error = %e,
                    "Error fetching features, returning empty list"
                );
                Vec::new()
            }
        }
    }

    /// Looks up the object id of the feature whose `id_key` equals `id`.
    ///
    /// Returns `Ok(None)` if no such feature exists.
    pub async fn resolve_object_id(
        &self,
        endpoint: &str,
        object_id_key: &str,
        id_key: &str,
        id: i64,
    ) -> Result<Option<i64>, ServiceError> {
        let query = FeatureQuery::new()
            .with_where(format!("{} = {}", id_key, id))
            .with_out_fields([object_id_key]);

        let features = self.query(endpoint, &query).await?;
        Ok(features
            .first()
            .and_then(|feature| feature.integer(object_id_key)))
    }

    /// Looks up the `(lat, lon)` of a feature.
    ///
    /// Point geometry is preferred; the `lat_key`/`lon_key` attributes are
    /// used when the layer has no point geometry. Returns `Ok(None)` when the
    /// feature carries neither.
    pub async fn fetch_location(
        &self,
        endpoint: &str,
        object_id: i64,
        lat_key: &str,
        lon_key: &str,
    ) -> Result<Option<(f64, f64)>, ServiceError> {
        let query = FeatureQuery::new()
            .with_object_ids([object_id])
            .with_out_fields([lat_key, lon_key])
            .with_geometry(true);

        let features = self.query(endpoint, &query).await?;
        let Some(feature) = features.first() else {
            return Ok(None);
        };

        let from_geometry = feature.geometry.and_then(|g| g.lat_lon());
        let from_attributes = match (feature.number(lat_key), feature.number(lon_key)) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        Ok(from_geometry.or(from_attributes))
    }

    /// Lists the attachments of a feature.
    pub async fn fetch_attachments(
        &self,
        endpoint: &str,
        object_id: i64,
    ) -> Result<Vec<AttachmentInfo>, ServiceError> {
        let path = format!("{}/attachments", object_id);
        let url = self.request_url(endpoint, &path, &[])?;
        let body = self.http.get(url.as_str()).await?;

        let response: AttachmentsResponse = serde_json::from_slice(&body)?;
        if let Some(error) = response.error {
            return Err(error.into());
        }
        Ok(response.attachment_infos)
    }

    /// Lists the download URLs of a feature's attachments.
    ///
    /// The URLs do not carry the API token.
    pub async fn fetch_attachment_urls(
        &self,
        endpoint: &str,
        object_id: i64,
    ) -> Result<Vec<String>, ServiceError> {
        let attachments = self.fetch_attachments(endpoint, object_id).await?;
        Ok(attachments
            .iter()
            .map(|a| attachment_url(endpoint, object_id, a.id))
            .collect())
    }

    fn request_url(
        &self,
        endpoint: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Url, ServiceError> {
        let base = format!("{}/{}", endpoint.trim_end_matches('/'), path);
        let mut url = Url::parse(&base).map_err(|e| ServiceError::InvalidUrl {
            url: strip_query(endpoint).to_string(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("f", "json");
            if let Some(token) = &self.api_token {
                pairs.append_pair("token", token);
            }
        }
        Ok(url)
    }
}

/// URL of a single attachment of a feature.
pub fn attachment_url(endpoint: &str, object_id: i64, attachment_id: i64) -> String {
    format!(
        "{}/{}/attachments/{}",
        endpoint.trim_end_matches('/'),
        object_id,
        attachment_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::http::tests::MockAsyncHttpClient;
    use serde_json::json;

    const ENDPOINT: &str = "https://services.example.com/arcgis/rest/services/Factories/FeatureServer/0";

    fn factories_body() -> serde_json::Value {
        json!({
            "features": [
                { "attributes": { "OBJECTID": 1, "Factory_ID": 10, "English_Name": "Stucky Mill" } },
                { "attributes": { "OBJECTID": 2, "Factory_ID": 11, "English_Name": "Junghans Factory" } }
            ]
        })
    }

    #[tokio::test]
    async fn test_query_features_returns_records() {
        let mock = MockAsyncHttpClient::failing().route_json("/query", factories_body());
        let client = FeatureLayerClient::new(mock);

        let features = client.query_features(ENDPOINT, None).await.unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].text("English_Name"), Some("Junghans Factory"));
    }

    #[tokio::test]
    async fn test_query_url_carries_predicate_and_token() {
        let mock = MockAsyncHttpClient::failing().route_json("/query", json!({ "features": [] }));
        let client = FeatureLayerClient::new(mock).with_api_token("s3cret");

        client
            .query_features(ENDPOINT, Some("Opening_Year > 1900"))
            .await
            .unwrap();

        let requests = client.http.requests();
        assert_eq!(requests.len(), 1);
        let url = Url::parse(&requests[0]).unwrap();
        assert_eq!(url.path(), "/arcgis/rest/services/Factories/FeatureServer/0/query");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("where".into(), "Opening_Year > 1900".into())));
        assert!(pairs.contains(&("outFields".into(), "*".into())));
        assert!(pairs.contains(&("f".into(), "json".into())));
        assert!(pairs.contains(&("token".into(), "s3cret".into())));
    }

    #[tokio::test]
    async fn test_missing_predicate_matches_all() {
        let mock = MockAsyncHttpClient::failing().route_json("/query", json!({ "features": [] }));
        let client = FeatureLayerClient::new(mock);

        client.query_features(ENDPOINT, None).await.unwrap();

        let url = Url::parse(&client.http.requests()[0]).unwrap();
        let where_clause = url
            .query_pairs()
            .find(|(k, _)| k == "where")
            .map(|(_, v)| v.into_owned());
        assert_eq!(where_clause.as_deref(), Some(MATCH_ALL));
    }

    #[tokio::test]
    async fn test_remote_error_is_reported() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/query",
            json!({ "error": { "code": 498, "message": "Invalid token." } }),
        );
        let client = FeatureLayerClient::new(mock);

        let result = client.query_features(ENDPOINT, None).await;
        assert_eq!(
            result.unwrap_err(),
            ServiceError::Remote {
                code: 498,
                message: "Invalid token.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let mock = MockAsyncHttpClient::with_response(Ok(b"<html>".to_vec()));
        let client = FeatureLayerClient::new(mock);

        let result = client.query_features(ENDPOINT, None).await;
        assert!(matches!(result.unwrap_err(), ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_features_swallows_transport_failure() {
        let client = FeatureLayerClient::new(MockAsyncHttpClient::failing());

        let features = client.fetch_features(ENDPOINT, None).await;
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let client = FeatureLayerClient::new(MockAsyncHttpClient::failing());

        let result = client.query_features("not a url", None).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::InvalidUrl { .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_object_id() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/query",
            json!({ "features": [ { "attributes": { "OBJECTID": 42 } } ] }),
        );
        let client = FeatureLayerClient::new(mock);

        let oid = client
            .resolve_object_id(ENDPOINT, "OBJECTID", "Factory_ID", 10)
            .await
            .unwrap();
        assert_eq!(oid, Some(42));

        let url = Url::parse(&client.http.requests()[0]).unwrap();
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "where" && v == "Factory_ID = 10"));
    }

    #[tokio::test]
    async fn test_resolve_object_id_not_found() {
        let mock = MockAsyncHttpClient::failing().route_json("/query", json!({ "features": [] }));
        let client = FeatureLayerClient::new(mock);

        let oid = client
            .resolve_object_id(ENDPOINT, "OBJECTID", "Factory_ID", 99)
            .await
            .unwrap();
        assert_eq!(oid, None);
    }

    #[tokio::test]
    async fn test_fetch_location_prefers_geometry() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/query",
            json!({ "features": [ {
                "attributes": { "Latitude": 1.0, "Longitude": 2.0 },
                "geometry": { "x": 12.32, "y": 45.42 }
            } ] }),
        );
        let client = FeatureLayerClient::new(mock);

        let location = client
            .fetch_location(ENDPOINT, 1, "Latitude", "Longitude")
            .await
            .unwrap();
        assert_eq!(location, Some((45.42, 12.32)));

        let url = Url::parse(&client.http.requests()[0]).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "objectIds" && v == "1"));
        assert!(url.query_pairs().any(|(k, v)| k == "outSR" && v == "4326"));
    }

    #[tokio::test]
    async fn test_fetch_location_falls_back_to_attributes() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/query",
            json!({ "features": [ { "attributes": { "Latitude": "45.43", "Longitude": 12.31 } } ] }),
        );
        let client = FeatureLayerClient::new(mock);

        let location = client
            .fetch_location(ENDPOINT, 1, "Latitude", "Longitude")
            .await
            .unwrap();
        assert_eq!(location, Some((45.43, 12.31)));
    }

    #[tokio::test]
    async fn test_fetch_location_absent() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/query",
            json!({ "features": [ { "attributes": { "Latitude": null } } ] }),
        );
        let client = FeatureLayerClient::new(mock);

        let location = client
            .fetch_location(ENDPOINT, 1, "Latitude", "Longitude")
            .await
            .unwrap();
        assert_eq!(location, None);
    }

    #[tokio::test]
    async fn test_fetch_attachment_urls() {
        let mock = MockAsyncHttpClient::failing().route_json(
            "/7/attachments",
            json!({ "attachmentInfos": [
                { "id": 3, "name": "front.jpg", "contentType": "image/jpeg" },
                { "id": 5, "name": "yard.jpg", "contentType": "image/jpeg" }
            ] }),
        );
        let client = FeatureLayerClient::new(mock).with_api_token("s3cret");

        let urls = client.fetch_attachment_urls(ENDPOINT, 7).await.unwrap();
        assert_eq!(
            urls,
            vec![
                format!("{}/7/attachments/3", ENDPOINT),
                format!("{}/7/attachments/5", ENDPOINT),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_attachments_empty() {
        let mock =
            MockAsyncHttpClient::failing().route_json("/attachments", json!({ "attachmentInfos": [] }));
        let client = FeatureLayerClient::new(mock);

        let urls = client.fetch_attachment_urls(ENDPOINT, 7).await.unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_attachment_url_trims_trailing_slash() {
        assert_eq!(
            attachment_url("https://host/FeatureServer/0/", 1, 2),
            "https://host/FeatureServer/0/1/attachments/2"
        );
    }
}
