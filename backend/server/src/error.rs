use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::StoreUnavailable("store call timed out".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::StoreUnavailable { .. } | AppError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::EncodingFailure { .. } | AppError::Config { .. } | AppError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::StoreUnavailable("down".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::EncodingFailure("oops".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_request_failures_are_client_errors() {
        for error in [
            AppError::StoreUnavailable("connection refused".into()),
            AppError::InvalidInput("malformed vote".into()),
        ] {
            let status = error.into_response().status();
            assert!(status.is_client_error(), "got {status}");
        }
    }

    #[tokio::test]
    async fn test_timeout_is_store_unavailable() {
        let elapsed = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            std::future::pending::<()>(),
        )
        .await
        .unwrap_err();

        let error = AppError::from(elapsed);
        assert!(matches!(error, AppError::StoreUnavailable(_)));
    }
}
