//! Error types for the DeCert server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use decert_core::Error as CoreError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the certificate core, mapped to a status code by
    /// variant.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request-shape problem caught before reaching the core.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Core(core) => match core {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::InvalidState { .. } => StatusCode::CONFLICT,
                CoreError::ImmutableField(_) => StatusCode::CONFLICT,
                CoreError::Chain { .. } => StatusCode::BAD_GATEWAY,
                CoreError::Serialization(_) | CoreError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            // Chain failures are reported, not swallowed: the caller needs
            // to know the record kept its previous state.
            AppError::Core(core @ CoreError::Chain { .. }) => {
                tracing::warn!("Chain gateway error: {}", core);
                (status, core.to_string()).into_response()
            }
            AppError::Core(core @ (CoreError::Storage(_) | CoreError::Serialization(_))) => {
                tracing::error!("Internal error: {}", core);
                (status, "Internal server error").into_response()
            }
            _ => (status, self.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decert_core::{ChainError, MintPhase, MintStatus};
    use uuid::Uuid;

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::from(CoreError::Validation("title".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(CoreError::NotFound(Uuid::nil()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_wrong_state_maps_to_409() {
        let err = AppError::from(CoreError::InvalidState {
            id: Uuid::nil(),
            expected: MintStatus::Unminted,
            actual: MintStatus::Minted,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_immutable_field_maps_to_409() {
        let err = AppError::from(CoreError::ImmutableField("mintReference"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_chain_failure_maps_to_502() {
        let err = AppError::from(CoreError::Chain {
            id: Uuid::nil(),
            phase: MintPhase::Prepare,
            source: ChainError::Unavailable("down".to_string()),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_storage_failure_maps_to_500() {
        let err = AppError::from(CoreError::Storage("connection reset".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_response_is_redacted() {
        let err = AppError::from(CoreError::Storage("password=hunter2".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_message() {
        let err = AppError::BadRequest("Missing certificate id or recipient address".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Missing certificate id"));
    }
}
