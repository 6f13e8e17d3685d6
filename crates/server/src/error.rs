//! Request failures and their HTTP mapping.
//!
//! Every failure is detected before delivery headers are set, so the
//! client always gets either the full workbook or a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use csvxl_io::ConvertError;
use serde::{Deserialize, Serialize};

pub const BAD_INPUT_MESSAGE: &str = "CSV data could not be read";
pub const CONVERSION_MESSAGE: &str = "An error occurred during conversion";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// CSV source present but empty
    #[error("bad input: {0}")]
    BadInput(String),
    /// Read, parse, build or serialization failure
    #[error(transparent)]
    Conversion(#[from] ConvertError),
    /// Conversion task panicked or was cancelled
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conversion(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::BadInput(_) => BAD_INPUT_MESSAGE,
            AppError::Conversion(_) | AppError::Internal(_) => CONVERSION_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("conversion failed: {}", self);
        } else {
            tracing::warn!("rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
