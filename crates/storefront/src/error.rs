//! Unified error handling with Sentry integration.
//!
//! Provides `AppError` for rejected form input, `report_upstream_error` for
//! catalog failures, and `ApiError` for the JSON endpoints under
//! `/api`, whose bodies are always `{"message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::printify::PrintifyError;

/// Application-level error type for the storefront.
///
/// Upstream catalog failures never reach this type: pages render them as an
/// inline banner and `/api` answers with [`ApiError`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Capture a failed catalog request to Sentry and log it.
///
/// Not-found errors are expected traffic and are not reported.
pub fn report_upstream_error(err: &PrintifyError, context: &str) {
    if err.is_not_found() {
        return;
    }

    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        context,
        "Catalog request failed"
    );
}

// =============================================================================
// JSON API errors
// =============================================================================

/// Error body for `/api` endpoints.
#[derive(Debug, Serialize)]
struct ApiErrorBody {
    message: String,
}

/// Error returned by JSON endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested product does not exist.
    #[error("Product not found")]
    ProductNotFound,

    /// Upstream failure; details stay in the logs.
    #[error("Failed to fetch product")]
    Upstream,
}

impl From<PrintifyError> for ApiError {
    fn from(err: PrintifyError) -> Self {
        if err.is_not_found() {
            Self::ProductNotFound
        } else {
            report_upstream_error(&err, "api");
            Self::Upstream
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ApiErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "5f1c")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
