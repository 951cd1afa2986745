use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum BillError {
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u8),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl BillError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BillError::UnknownDevice(_) => StatusCode::NOT_FOUND,
            BillError::InvalidMonth(_) | BillError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}
