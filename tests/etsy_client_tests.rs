//! Tests of the reqwest-backed Etsy client against a local stand-in for the Etsy API.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use common::{body_json, get as get_request, TEST_API_KEY};
use usedfinder::config::EtsyConfig;
use usedfinder::etsy::{EtsyClient, EtsyError, ListingSource, SearchService, UpstreamQuery};
use usedfinder::routes::create_router;
use usedfinder::state::AppState;

/// What the fake upstream saw on its last request
#[derive(Debug, Clone, Default)]
struct Seen {
    params: HashMap<String, String>,
    headers: HashMap<String, String>,
}

type SeenLog = Arc<Mutex<Vec<Seen>>>;

async fn active_listings(
    State(log): State<SeenLog>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    log.lock().unwrap().push(Seen { params, headers });

    Json(json!({
        "count": 2,
        "results": [
            {
                "listing_id": 111,
                "title": "Wool blanket",
                "price": {"amount": 4200, "divisor": 100, "currency_code": "CAD"},
                "images": [{"url_570xN": "https://i.etsystatic.com/570.jpg"}],
                "shop": {"location": "Montreal"}
            },
            {"listing_id": 222}
        ]
    }))
}

async fn forbidden() -> impl IntoResponse {
    (StatusCode::FORBIDDEN, "x".repeat(1000))
}

async fn not_json() -> impl IntoResponse {
    (StatusCode::OK, "<html>maintenance</html>")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"results": []}))
}

/// Start the fake upstream and return its base URL plus the request log
async fn spawn_fake_etsy() -> (String, SeenLog) {
    let log: SeenLog = Arc::default();
    let app = Router::new()
        .route("/v3/application/listings/active", get(active_listings))
        .route("/forbidden", get(forbidden))
        .route("/not-json", get(not_json))
        .route("/slow", get(slow))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

fn client_for(endpoint: String, timeout_seconds: u64) -> EtsyClient {
    let config = EtsyConfig {
        api_key: Some(TEST_API_KEY.to_string()),
        endpoint,
        timeout_seconds,
        ..EtsyConfig::default()
    };
    EtsyClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_sends_fixed_parameters_and_headers() {
    let (base, log) = spawn_fake_etsy().await;
    let client = client_for(format!("{}/v3/application/listings/active", base), 20);

    let body = client
        .active_listings(TEST_API_KEY, &UpstreamQuery::new("wool blanket", 12))
        .await
        .unwrap();
    assert_eq!(body["count"], 2);

    let seen = log.lock().unwrap().last().cloned().unwrap();
    assert_eq!(seen.params["keywords"], "wool blanket");
    assert_eq!(seen.params["limit"], "12");
    assert_eq!(seen.params["includes"], "images,shop");
    assert_eq!(seen.params["sort_on"], "score");
    assert_eq!(seen.params["state"], "active");
    assert_eq!(seen.params.len(), 5);

    assert_eq!(seen.headers["x-api-key"], TEST_API_KEY);
    assert_eq!(seen.headers["accept"], "application/json");
    assert_eq!(seen.headers["user-agent"], "UsedFinder/1.0 (+iOS)");
}

#[tokio::test]
async fn test_error_status_with_truncated_body() {
    let (base, _log) = spawn_fake_etsy().await;
    let client = client_for(format!("{}/forbidden", base), 20);

    let err = client
        .active_listings(TEST_API_KEY, &UpstreamQuery::new("lamp", 1))
        .await
        .unwrap_err();

    match err {
        EtsyError::Status { status, body } => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body.chars().count(), 256);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let (base, _log) = spawn_fake_etsy().await;
    let client = client_for(format!("{}/not-json", base), 20);

    let err = client
        .active_listings(TEST_API_KEY, &UpstreamQuery::new("lamp", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EtsyError::Decode(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let (base, _log) = spawn_fake_etsy().await;
    let client = client_for(format!("{}/slow", base), 1);

    let err = client
        .active_listings(TEST_API_KEY, &UpstreamQuery::new("lamp", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EtsyError::Timeout));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    // Bind then drop a listener so the port is very likely closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}/listings", addr), 5);
    let err = client
        .active_listings(TEST_API_KEY, &UpstreamQuery::new("lamp", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EtsyError::Transport(_)));
}

#[tokio::test]
async fn test_end_to_end_search_through_router() {
    let (base, log) = spawn_fake_etsy().await;
    let config = EtsyConfig {
        api_key: Some(TEST_API_KEY.to_string()),
        endpoint: format!("{}/v3/application/listings/active", base),
        ..EtsyConfig::default()
    };
    let client = EtsyClient::new(&config).unwrap();
    let app = create_router(AppState::new(SearchService::new(&config, Arc::new(client))));

    let response = app
        .oneshot(get_request("/etsy?q=blanket&limit=500&loc=Quebec"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {
                "title": "Wool blanket",
                "price": "CAD 42.00",
                "url": "https://www.etsy.com/listing/111",
                "thumb": "https://i.etsystatic.com/570.jpg",
                "location": "Montreal"
            },
            {
                "title": "Etsy listing",
                "price": null,
                "url": "https://www.etsy.com/listing/222",
                "thumb": null,
                "location": null
            }
        ])
    );

    let seen = log.lock().unwrap().last().cloned().unwrap();
    assert_eq!(seen.params["limit"], "48");
    assert!(!seen.params.contains_key("loc"));
}

#[tokio::test]
async fn test_end_to_end_without_credential_never_reaches_upstream() {
    let (base, log) = spawn_fake_etsy().await;
    let config = EtsyConfig {
        endpoint: format!("{}/v3/application/listings/active", base),
        ..EtsyConfig::default()
    };
    let client = EtsyClient::new(&config).unwrap();
    let app = create_router(AppState::new(SearchService::new(&config, Arc::new(client))));

    let response = app.oneshot(get_request("/etsy?q=blanket")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(log.lock().unwrap().is_empty());
}
