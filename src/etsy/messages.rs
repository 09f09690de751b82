//! Request and error types shared by the search service and the upstream client.

use std::fmt;

use http::StatusCode;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SEARCH_LIMIT;

/// Sub-resources embedded in each upstream listing
pub const UPSTREAM_INCLUDES: &str = "images,shop";

/// Upstream sort order (relevance score)
pub const UPSTREAM_SORT_ON: &str = "score";

/// Only listings currently for sale
pub const UPSTREAM_STATE: &str = "active";

/// Inbound search parameters as sent by the app.
///
/// `loc` is accepted for compatibility with existing clients but is neither
/// forwarded upstream nor used to filter results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub loc: Option<String>,
    #[serde(
        default = "SearchQuery::default_limit",
        deserialize_with = "deserialize_saturating_limit"
    )]
    pub limit: i64,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            loc: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_location(mut self, loc: impl Into<String>) -> Self {
        self.loc = Some(loc.into());
        self
    }

    fn default_limit() -> i64 {
        DEFAULT_SEARCH_LIMIT
    }
}

/// Parse an integer, saturating at the `i64` bounds when it does not fit.
///
/// Returns `None` for anything that is not an optionally signed run of digits.
fn parse_saturating(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }

    let (negative, digits) = match value.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Accepts any integer for `limit`; out-of-range values are clamped later.
fn deserialize_saturating_limit<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LimitVisitor;

    impl Visitor<'_> for LimitVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            Ok(i64::try_from(value).unwrap_or(i64::MAX))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            parse_saturating(value).ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(LimitVisitor)
}

/// Query string sent to the active listings endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamQuery {
    pub keywords: String,
    pub limit: i64,
    pub includes: &'static str,
    pub sort_on: &'static str,
    pub state: &'static str,
}

impl UpstreamQuery {
    /// Build the upstream query for already-clamped `limit`.
    pub fn new(keywords: &str, limit: i64) -> Self {
        Self {
            keywords: keywords.to_string(),
            limit,
            includes: UPSTREAM_INCLUDES,
            sort_on: UPSTREAM_SORT_ON,
            state: UPSTREAM_STATE,
        }
    }
}

/// Failures of the search operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EtsyError {
    #[error("query parameter `q` must be at least 1 character")]
    EmptyQuery,

    #[error("ETSY_API_KEY not configured on server.")]
    NotConfigured,

    /// Upstream answered with a non-success status. `body` is already truncated.
    #[error("Etsy API error: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Etsy API timed out")]
    Timeout,

    #[error("Etsy API request failed: {0}")]
    Transport(String),

    #[error("Etsy API returned invalid JSON: {0}")]
    Decode(String),
}
