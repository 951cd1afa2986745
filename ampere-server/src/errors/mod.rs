pub mod api;
pub mod bill;

pub use api::ApiError;
pub use bill::BillError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Gateway callers only look at the status and read the body as text
        let (status, error_message) = match self {
            ApiError::BillError(e) => (e.status_code(), e.to_string()),
            ApiError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, error_message).into_response()
    }
}
