//! Error responses.
//!
//! Every failure is returned as an error list:
//! `{"errors":[{"type":"...","message":"...",...}]}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::availability::FacadeError;
use crate::codec::FilterError;
use crate::observability::metrics;

/// One entry of an error list body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorListDto {
    pub errors: Vec<ErrorDto>,
}

/// Errors a controller can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Facade(#[from] FacadeError),

    /// Query string that does not deserialize into the handler's parameters.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Cannot find resource for {0}")]
    UnknownResource(String),

    #[error("Request method '{method}' is not supported for {path}")]
    MethodNotAllowed { method: String, path: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Filter(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Facade(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnknownResource(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn to_error_list(&self) -> ErrorListDto {
        let dto = match self {
            ApiError::Filter(e) => ErrorDto {
                error_type: "RequestParameterError".to_string(),
                message: e.to_string(),
                subject: Some(e.field().to_string()),
                subject_type: Some("parameter".to_string()),
                reason: Some(e.reason().to_string()),
            },
            ApiError::InvalidRequest(message) => ErrorDto {
                error_type: "RequestParameterError".to_string(),
                message: message.clone(),
                subject: None,
                subject_type: Some("parameter".to_string()),
                reason: Some("invalid".to_string()),
            },
            ApiError::Facade(e) => ErrorDto {
                error_type: "SystemError".to_string(),
                message: e.to_string(),
                subject: None,
                subject_type: None,
                reason: None,
            },
            ApiError::UnknownResource(_) => ErrorDto {
                error_type: "UnknownResourceError".to_string(),
                message: self.to_string(),
                subject: None,
                subject_type: None,
                reason: None,
            },
            ApiError::MethodNotAllowed { .. } => ErrorDto {
                error_type: "HttpRequestMethodNotSupportedError".to_string(),
                message: self.to_string(),
                subject: None,
                subject_type: None,
                reason: None,
            },
        };
        ErrorListDto { errors: vec![dto] }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Filter(e) => {
                metrics::record_filter_rejection(e.reason());
                tracing::debug!(error = %e, "Rejected filter parameter");
            }
            ApiError::Facade(e) => tracing::error!(error = %e, "Availability facade failed"),
            ApiError::InvalidRequest(message) => {
                metrics::record_filter_rejection("invalid");
                tracing::debug!(error = %message, "Rejected query string");
            }
            ApiError::UnknownResource(path) => tracing::debug!(path = %path, "No handler registered"),
            ApiError::MethodNotAllowed { method, path } => {
                tracing::debug!(method = %method, path = %path, "Method not allowed")
            }
        }
        (self.status(), Json(self.to_error_list())).into_response()
    }
}
