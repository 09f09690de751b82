//! Etsy marketplace search.
//!
//! The [`SearchService`] validates an inbound query, checks that a credential
//! is configured, asks a [`ListingSource`] for one page of active listings and
//! reshapes the raw JSON into [`Listing`] records. [`EtsyClient`] is the
//! production source; tests substitute their own.

pub mod client;
pub mod messages;
pub mod normalize;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::EtsyClient;
pub use messages::{EtsyError, SearchQuery, UpstreamQuery};
pub use service::{clamp_limit, SearchService};

/// A marketplace item in the format the app renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub price: Option<String>,
    pub url: String,
    pub thumb: Option<String>,
    pub location: Option<String>,
}

/// Upstream provider of raw active-listing search results.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of active listings and return the decoded response body.
    async fn active_listings(
        &self,
        api_key: &str,
        query: &UpstreamQuery,
    ) -> Result<Value, EtsyError>;
}
