//! Integration tests for the feature-service client and hydration.
//!
//! These tests run the reqwest transport against a local feature service:
//! - Queries, server-side predicates and token pass-through
//! - Remote errors reported with HTTP 200
//! - Hydration of factories and collection of their images
//! - Downgrading of transport failures at the `fetch_*` boundary
//!
//! Run with: `cargo test --test feature_service_integration`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use giudecca::coord::{MapBounds, PixelCoord};
use giudecca::factory::{HydrationError, Hydrator};
use giudecca::feature::AttributeValue;
use giudecca::filter::filter_by_substring;
use giudecca::service::{AsyncReqwestClient, FeatureLayerClient, ServiceError};

const TOKEN: &str = "opaque-token";

// ============================================================================
// Local feature service
// ============================================================================

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn factories() -> Vec<Value> {
    vec![
        json!({
            "attributes": {
                "OBJECTID": 10,
                "Factory_ID": 1,
                "English_Name": "Stucky Mill",
                "Italian_Name": "Molino Stucky",
                "Opening_Year": 1884,
                "Closing_Year": 1955
            },
            "geometry": { "x": 12.5, "y": 45.5 }
        }),
        json!({
            "attributes": {
                "OBJECTID": 20,
                "Factory_ID": 2,
                "English_Name": "Junghans Watch Factory",
                "Opening_Year": 1878,
                "Closing_Year": 1972,
                "Latitude": 45.25,
                "Longitude": 12.75
            }
        }),
        json!({
            "attributes": {
                "OBJECTID": 30,
                "Factory_ID": 3,
                "English_Name": "Cotton Mill",
                "Opening_Year": 1883,
                "Closing_Year": null
            }
        }),
    ]
}

fn object_id(feature: &Value) -> i64 {
    feature["attributes"]["OBJECTID"].as_i64().unwrap()
}

async fn query(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    requests.lock().unwrap().push(params.clone());

    if params.get("token").is_some_and(|t| t != TOKEN) {
        return Json(json!({ "error": { "code": 498, "message": "Invalid token.", "details": [] } }));
    }

    let where_clause = params.get("where").map(String::as_str).unwrap_or("1=1");
    let with_geometry = params.get("returnGeometry").map(String::as_str) == Some("true");

    let features: Vec<Value> = factories()
        .into_iter()
        .filter(|feature| match params.get("objectIds") {
            Some(ids) => ids
                .split(',')
                .any(|id| id.parse::<i64>().ok() == Some(object_id(feature))),
            None => match where_clause.strip_prefix("Factory_ID = ") {
                Some(id) => feature["attributes"]["Factory_ID"].to_string() == id,
                None => true,
            },
        })
        .map(|mut feature| {
            if !with_geometry {
                if let Some(obj) = feature.as_object_mut() {
                    obj.remove("geometry");
                }
            }
            feature
        })
        .collect();

    Json(json!({ "objectIdFieldName": "OBJECTID", "features": features }))
}

async fn attachments(Path(oid): Path<i64>) -> Json<Value> {
    let infos = if oid == 10 {
        json!([
            { "id": 100, "name": "mill.jpg", "contentType": "image/jpeg", "size": 1024 },
            { "id": 101, "name": "interior.jpg", "contentType": "image/jpeg", "size": 2048 }
        ])
    } else {
        json!([])
    };
    Json(json!({ "attachmentInfos": infos }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Start the local service; returns its base URL and the recorded query parameters.
async fn start_service() -> (String, Requests) {
    let requests: Requests = Arc::default();
    let app = Router::new()
        .route("/Factories/FeatureServer/0/query", get(query))
        .route("/Factories/FeatureServer/0/:oid/attachments", get(attachments))
        .route("/Broken/FeatureServer/0/query", get(broken))
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), requests)
}

fn client() -> FeatureLayerClient<AsyncReqwestClient> {
    FeatureLayerClient::new(AsyncReqwestClient::with_timeout(5).unwrap()).with_api_token(TOKEN)
}

fn bounds() -> MapBounds {
    MapBounds::new(45.0, 46.0, 12.0, 13.0, 1000.0, 500.0).unwrap()
}

// ============================================================================
// Feature queries
// ============================================================================

#[tokio::test]
async fn test_query_features_passes_predicate_and_token() {
    let (base, requests) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);

    let records = client()
        .query_features(&endpoint, Some("Factory_ID = 2"))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text("English_Name"), Some("Junghans Watch Factory"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["where"], "Factory_ID = 2");
    assert_eq!(requests[0]["outFields"], "*");
    assert_eq!(requests[0]["f"], "json");
    assert_eq!(requests[0]["token"], TOKEN);
}

#[tokio::test]
async fn test_query_features_defaults_to_all() {
    let (base, requests) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);

    let records = client().query_features(&endpoint, None).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(requests.lock().unwrap()[0]["where"], "1=1");
}

#[tokio::test]
async fn test_invalid_token_is_remote_error() {
    let (base, _) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);
    let client = FeatureLayerClient::new(AsyncReqwestClient::new().unwrap()).with_api_token("wrong");

    let err = client.query_features(&endpoint, None).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Remote {
            code: 498,
            message: "Invalid token.".to_string()
        }
    );

    assert!(client.fetch_features(&endpoint, None).await.is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let (base, _) = start_service().await;
    let endpoint = format!("{}/Broken/FeatureServer/0", base);

    let err = client().query_features(&endpoint, None).await.unwrap_err();
    match err {
        ServiceError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(!url.contains(TOKEN), "token leaked into error: {url}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_service_yields_empty_factories() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let endpoint = format!("http://{}/Factories/FeatureServer/0", addr);

    let hydrator = Hydrator::new(client());
    assert!(hydrator.fetch_factories(&endpoint, None).await.is_empty());

    let err = hydrator.try_fetch_factories(&endpoint, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Http(_)));
}

#[tokio::test]
async fn test_fetch_location_prefers_geometry() {
    let (base, requests) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);

    let location = client()
        .fetch_location(&endpoint, 10, "Latitude", "Longitude")
        .await
        .unwrap();
    assert_eq!(location, Some((45.5, 12.5)));

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0]["objectIds"], "10");
    assert_eq!(requests[0]["returnGeometry"], "true");
    assert_eq!(requests[0]["outSR"], "4326");
}

// ============================================================================
// Hydration
// ============================================================================

#[tokio::test]
async fn test_hydrate_factories() {
    let (base, _) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);
    let hydrator = Hydrator::new(client()).with_bounds(bounds());

    let report = hydrator.try_fetch_factories(&endpoint, None).await.unwrap();

    assert!(report.is_complete());
    let factories = report.factories;
    assert_eq!(
        factories.iter().map(|f| f.factory_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    // Point geometry
    assert_eq!(factories[0].object_id, Some(10));
    assert_eq!(factories[0].position, Some(PixelCoord { x: 500.0, y: 250.0 }));

    // Latitude/Longitude attributes
    assert_eq!(factories[1].position, Some(PixelCoord { x: 750.0, y: 375.0 }));

    // No coordinates at all
    assert_eq!(factories[2].object_id, Some(30));
    assert!(factories[2].location.is_none());
    assert!(factories[2].position.is_none());
}

#[tokio::test]
async fn test_hydrate_unknown_factory_is_reported() {
    let (base, _) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);
    let hydrator = Hydrator::new(client());

    let records = vec![
        giudecca::feature::FeatureRecord::from_attributes([(
            "Factory_ID",
            AttributeValue::Integer(1),
        )]),
        giudecca::feature::FeatureRecord::from_attributes([(
            "Factory_ID",
            AttributeValue::Integer(99),
        )]),
    ];

    let report = hydrator.hydrate_all(&endpoint, &records).await;

    assert_eq!(report.factories.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].factory_id, Some(99));
    assert_eq!(
        report.failures[0].error,
        HydrationError::ObjectNotFound { factory_id: 99 }
    );
}

#[tokio::test]
async fn test_fetch_all_factory_images() {
    let (base, requests) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);
    let hydrator = Hydrator::new(client()).with_max_concurrent(2);

    let report = hydrator.fetch_all_factory_images(&endpoint).await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(
        report.images[&1],
        vec![
            format!("{}/10/attachments/100", endpoint),
            format!("{}/10/attachments/101", endpoint),
        ]
    );
    assert!(report.images[&2].is_empty());
    assert!(report.images[&3].is_empty());

    // Attachment URLs never carry the token, requests always do
    assert!(report.images[&1].iter().all(|url| !url.contains(TOKEN)));
    assert!(requests
        .lock()
        .unwrap()
        .iter()
        .all(|params| params.get("token").map(String::as_str) == Some(TOKEN)));
}

// ============================================================================
// Filters over fetched records
// ============================================================================

#[tokio::test]
async fn test_filter_fetched_records() {
    let (base, _) = start_service().await;
    let endpoint = format!("{}/Factories/FeatureServer/0", base);

    let records = client().fetch_features(&endpoint, None).await;
    let ids = filter_by_substring(&records, "English_Name", "mill", "Factory_ID");

    assert_eq!(
        ids,
        vec![AttributeValue::Integer(1), AttributeValue::Integer(3)]
    );
}
