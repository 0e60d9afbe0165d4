// Mapping of pipeline errors onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::models::ErrorBody;
use crate::database_ops::{RefreshError, StoreError};
use crate::query::UnknownSort;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("External data source unavailable")]
    UpstreamUnavailable { source_name: &'static str },
    #[error("Country not found")]
    NotFound,
    #[error("Validation failed")]
    Validation(BTreeMap<&'static str, &'static str>),
    #[error("{0}")]
    BadRequest(String),
    #[error("Summary image not found")]
    ImageNotFound,
    /// Detail is logged where the error is converted, never sent to the client.
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound | Self::ImageNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            Self::UpstreamUnavailable { source_name } => Some(serde_json::Value::from(format!(
                "Could not fetch data from {source_name}"
            ))),
            Self::Validation(fields) => serde_json::to_value(fields).ok(),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "storage failure");
        Self::Internal
    }
}

impl From<RefreshError> for ApiError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::Upstream(source) => {
                tracing::error!(
                    source_name = source.source_name(),
                    url = source.url(),
                    error = %source,
                    "refresh aborted: upstream unavailable"
                );
                Self::UpstreamUnavailable {
                    source_name: source.source_name(),
                }
            }
        }
    }
}

impl From<UnknownSort> for ApiError {
    fn from(e: UnknownSort) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        tracing::error!(error = %e, "i/o failure");
        Self::Internal
    }
}
