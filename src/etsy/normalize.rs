//! Reshaping of upstream listing JSON into [`Listing`] records.
//!
//! Every function here is total: malformed fields are skipped rather than
//! reported. The only reason an item is dropped is that no page URL can be
//! derived for it.

use serde_json::Value;

use crate::config::{DEFAULT_LISTING_TITLE, LISTING_PAGE_BASE};

use super::Listing;

/// Field names that may hold the result array, in order of preference
const RESULT_FIELDS: [&str; 2] = ["results", "listings"];

/// Image variants, largest first
const IMAGE_VARIANTS: [&str; 3] = ["url_fullxfull", "url_570xN", "url_170x135"];

/// Shop fields that may describe where the seller is
const SHOP_LOCATION_FIELDS: [&str; 2] = ["city", "location"];

/// Currency fields on a structured price, in order of preference
const CURRENCY_FIELDS: [&str; 2] = ["currency_code", "currency"];

/// Locate the listing array in an upstream response body.
///
/// Returns the first non-empty array found under a known field name, or an
/// empty slice when the body is not an object or carries no listings.
pub fn extract_items(body: &Value) -> &[Value] {
    RESULT_FIELDS
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Convert a single upstream item, or `None` if it has no usable page URL.
pub fn normalize_listing(item: &Value) -> Option<Listing> {
    let url = listing_url(item)?;

    Some(Listing {
        title: non_empty_str(item.get("title"))
            .unwrap_or(DEFAULT_LISTING_TITLE)
            .to_string(),
        price: price(item),
        url,
        thumb: thumbnail(item),
        location: shop_location(item),
    })
}

fn listing_url(item: &Value) -> Option<String> {
    match listing_id(item) {
        Some(id) => Some(format!("{}{}", LISTING_PAGE_BASE, id)),
        None => non_empty_str(item.get("url")).map(str::to_string),
    }
}

/// Non-zero numeric listing id, given either as a JSON integer or digit string
fn listing_id(item: &Value) -> Option<u64> {
    let id = match item.get("listing_id")? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (id != 0).then_some(id)
}

fn price(item: &Value) -> Option<String> {
    match item.get("price")? {
        price @ Value::Object(_) => format_price(price),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Format `{"amount": 2550, "currency_code": "USD"}` as `"USD 25.50"`.
///
/// `amount` is in minor units.
fn format_price(price: &Value) -> Option<String> {
    let currency = first_non_empty(price, &CURRENCY_FIELDS)?;
    let amount = match price.get("amount")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !amount.is_finite() {
        return None;
    }
    Some(format!("{} {:.2}", currency, amount / 100.0))
}

fn thumbnail(item: &Value) -> Option<String> {
    let first = item.get("images")?.as_array()?.first()?;
    first_non_empty(first, &IMAGE_VARIANTS).map(str::to_string)
}

fn shop_location(item: &Value) -> Option<String> {
    let shop = item.get("shop")?;
    first_non_empty(shop, &SHOP_LOCATION_FIELDS).map(str::to_string)
}

fn first_non_empty<'a>(object: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|field| non_empty_str(object.get(field)))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
