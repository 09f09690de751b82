//! Search service: input checks, credential check, one upstream call, reshaping.

use std::sync::Arc;

use tracing::instrument;

use crate::config::{EtsyConfig, MAX_SEARCH_LIMIT, MIN_SEARCH_LIMIT};

use super::messages::{EtsyError, SearchQuery, UpstreamQuery};
use super::normalize::{extract_items, normalize_listing};
use super::{Listing, ListingSource};

/// Clamp a requested page size into the range accepted upstream.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT)
}

/// Proxies searches to a [`ListingSource`].
///
/// Holds the credential read at startup. A missing credential is only reported
/// when a search is attempted, so the rest of the service keeps running.
#[derive(Clone)]
pub struct SearchService {
    api_key: Option<Arc<str>>,
    source: Arc<dyn ListingSource>,
}

impl SearchService {
    pub fn new(config: &EtsyConfig, source: Arc<dyn ListingSource>) -> Self {
        Self {
            api_key: config.api_key().map(Arc::from),
            source,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search active listings and return them normalized, in upstream order.
    ///
    /// Performs exactly one upstream call on success paths and none when the
    /// query is empty or no credential is configured.
    #[instrument(
        name = "etsy::search",
        skip(self, query),
        fields(q = %query.q, limit = query.limit)
    )]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, EtsyError> {
        if query.q.is_empty() {
            return Err(EtsyError::EmptyQuery);
        }

        let api_key = self.api_key.as_deref().ok_or(EtsyError::NotConfigured)?;

        if let Some(loc) = &query.loc {
            tracing::debug!(loc = %loc, "Location filter accepted but not applied");
        }

        let limit = clamp_limit(query.limit);
        let upstream = UpstreamQuery::new(&query.q, limit);
        let body = self.source.active_listings(api_key, &upstream).await?;

        let items = extract_items(&body);
        let listings: Vec<Listing> = items
            .iter()
            .filter_map(normalize_listing)
            .take(limit as usize)
            .collect();

        tracing::debug!(
            received = items.len(),
            returned = listings.len(),
            "Normalized Etsy listings"
        );

        Ok(listings)
    }
}
