//! Mapping of failures to HTTP responses.

use super::params::ParamError;
use crate::service::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by the HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Route matched but the resource does not exist (e.g. wrong extension)
    NotFound,
    Service(ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError::Service(e)
    }
}

impl From<ParamError> for ApiError {
    fn from(e: ParamError) -> Self {
        ApiError::Service(ServiceError::InvalidArgument(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only client errors explain themselves; server failures stay opaque.
        let body = match &self {
            ApiError::Service(ServiceError::InvalidArgument(msg)) => msg.clone(),
            _ => status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(ParamError::UnsupportedBinMode("square".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::StorageUnavailable("down".to_string())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ServiceError::StorageCorruption("bad".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ServiceError::Internal("oops".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
