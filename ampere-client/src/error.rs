use ampere_api::models::UnknownChannel;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bridge not found: {0}")]
    BridgeNotFound(String),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Billing request failed: {0}")]
    Billing(#[from] reqwest::Error),

    #[error("Invalid input `{0}`: please enter a valid number of minutes")]
    InvalidLimit(String),

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u8),

    #[error("{0}")]
    UnknownChannel(#[from] UnknownChannel),

    #[error("Monitor is not running")]
    MonitorStopped,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidLimit(_) | Error::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            Error::UnknownChannel(_) => StatusCode::NOT_FOUND,
            Error::Billing(_) => StatusCode::BAD_GATEWAY,
            Error::BridgeNotFound(_) | Error::Serial(_) | Error::Io(_) | Error::MonitorStopped => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("control request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
