use axum::http::StatusCode;
use std::path::PathBuf;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "failed to persist fitness data");
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Rejected user input. Forms drop these silently; the JSON API reports them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("{field} must not exceed {max}")]
    TooLarge { field: &'static str, max: f64 },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("unknown activity type '{0}'")]
    UnknownType(String),

    #[error("unknown gender '{0}'")]
    UnknownGender(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("name must not be empty")]
    EmptyName,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create data directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
}
