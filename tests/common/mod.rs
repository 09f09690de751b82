//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;

use usedfinder::config::EtsyConfig;
use usedfinder::etsy::{EtsyError, ListingSource, SearchService, UpstreamQuery};
use usedfinder::routes::create_router;
use usedfinder::state::AppState;

pub const TEST_API_KEY: &str = "test-api-key";

/// Listing source that records calls and replies with a fixed result
pub struct StubSource {
    calls: Mutex<Vec<UpstreamQuery>>,
    reply: Result<Value, EtsyError>,
}

impl StubSource {
    pub fn replying(reply: Result<Value, EtsyError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<UpstreamQuery> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ListingSource for StubSource {
    async fn active_listings(
        &self,
        api_key: &str,
        query: &UpstreamQuery,
    ) -> Result<Value, EtsyError> {
        assert_eq!(api_key, TEST_API_KEY);
        self.calls.lock().unwrap().push(query.clone());
        self.reply.clone()
    }
}

pub fn etsy_config(api_key: Option<&str>) -> EtsyConfig {
    EtsyConfig {
        api_key: api_key.map(str::to_string),
        ..EtsyConfig::default()
    }
}

/// Router wired to `source`, with or without a credential
pub fn app_with(source: Arc<dyn ListingSource>, api_key: Option<&str>) -> axum::Router {
    let search = SearchService::new(&etsy_config(api_key), source);
    create_router(AppState::new(search))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
