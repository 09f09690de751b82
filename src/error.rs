use axum::{
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::etsy::EtsyError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Etsy(#[from] EtsyError),
}

/// JSON error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Etsy(EtsyError::EmptyQuery) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Etsy(EtsyError::NotConfigured) => StatusCode::NOT_IMPLEMENTED,
            AppError::Etsy(EtsyError::Status { status, .. }) => *status,
            AppError::Etsy(EtsyError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Etsy(EtsyError::Transport(_) | EtsyError::Decode(_)) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Message returned to the client. Transport details stay in the logs.
    pub fn detail(&self) -> String {
        match self {
            AppError::InvalidRequest(message) => message.clone(),
            AppError::Etsy(EtsyError::Transport(_)) => "Etsy API request failed".to_string(),
            AppError::Etsy(EtsyError::Decode(_)) => "Etsy API returned invalid JSON".to_string(),
            AppError::Etsy(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::InvalidRequest(_) | AppError::Etsy(EtsyError::EmptyQuery) => {
                tracing::debug!(error = %self, "Rejected request");
            }
            AppError::Etsy(EtsyError::NotConfigured) => {
                tracing::warn!("Search requested but ETSY_API_KEY is not configured");
            }
            AppError::Etsy(EtsyError::Status { .. }) => {
                tracing::warn!(status = status.as_u16(), error = %self, "Upstream error");
            }
            AppError::Etsy(_) => {
                tracing::error!(error = %self, "Upstream request failed");
            }
        }

        let body = ErrorBody {
            detail: self.detail(),
        };

        let mut response = (status, Json(body)).into_response();
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}
