// API module exposing the explorer over HTTP
// Author: Gabriel Demetrios Lafis

mod handlers;
mod models;
mod routes;
mod server;

pub use handlers::*;
pub use models::*;
pub use routes::*;
pub use server::*;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::data::DataError;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Data(#[from] DataError),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Data(DataError::SourceUnavailable(_)) => "source_unavailable",
            ApiError::Data(DataError::SchemaViolation(_)) => "schema_violation",
            ApiError::Data(DataError::UnknownAttribute(_)) | ApiError::Validation(_) => "validation",
            ApiError::Data(_) => "internal",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Data(DataError::SourceUnavailable(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Data(DataError::UnknownAttribute(_)) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
