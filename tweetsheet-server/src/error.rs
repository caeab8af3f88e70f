//! Error types for the HTTP surface.
//!
//! Errors are converted to the wire shape `{"error": <text>}`; eager input
//! validation answers 400, everything else collapses to 500 — the contract
//! does not distinguish bad upstreams from internal faults.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use tweetsheet_common::TweetsheetError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// A required request field is missing or empty.
    BadRequest(String),
    /// Anything that aborts the request after validation.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) | AppError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<TweetsheetError> for AppError {
    fn from(err: TweetsheetError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
