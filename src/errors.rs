use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("invalid date, expected YYYY-MM-DD: {0}")]
    InvalidDateFormat(String),

    #[error("invalid date range: end date must be after start date")]
    InvalidRange,

    #[error("price must be greater than zero")]
    InvalidPrice,

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("seasonal rate scope is ambiguous: give either a room or a property, not both")]
    ScopeAmbiguous,

    #[error("seasonal rate scope is missing: give a room or a property")]
    ScopeMissing,

    #[error("seasonal rate overlaps an existing rate in the same scope")]
    RateConflict,

    #[error("maintenance block overlaps an existing block for this room")]
    BlockConflict,

    #[error("seasonal rate has already started and can no longer be changed")]
    ImmutablePastRate,

    #[error("maintenance block has already started and can no longer be changed")]
    ImmutablePastBlock,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidDateFormat(_)
            | AppError::InvalidRange
            | AppError::InvalidPrice
            | AppError::CapacityExceeded(_)
            | AppError::ScopeAmbiguous
            | AppError::ScopeMissing => StatusCode::BAD_REQUEST,
            AppError::RateConflict
            | AppError::BlockConflict
            | AppError::ImmutablePastRate
            | AppError::ImmutablePastBlock => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
