pub mod blocks;
pub mod health;
pub mod properties;
pub mod rates;
pub mod search;

use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;

/// Tenant identity for the management endpoints. Authentication itself lives
/// upstream; this layer only requires the header the gateway injects.
pub(crate) fn tenant_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("x-tenant-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

/// Serve a pre-serialized (possibly cached) JSON body.
pub(crate) fn json_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
