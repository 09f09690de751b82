//! Shared application state for request handlers.

use crate::etsy::SearchService;

/// Shared application state, cloneable across handlers.
///
/// Everything in here is immutable after startup; the search service carries
/// the credential and the upstream client.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self { search }
    }
}
