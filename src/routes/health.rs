//! Health check endpoint for container orchestration.
//!
//! Liveness only: it does not check the upstream credential or reach Etsy,
//! so a missing key never fails the probe.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
}

/// Health check handler, always `{"ok": true}`.
pub async fn health() -> Json<Health> {
    Json(Health { ok: true })
}
