use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Upstream returned {status}")]
    Upstream { status: u16, body: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    /// Prefix a store failure with the operation that hit it.
    ///
    /// Other variants pass through untouched so that client errors keep
    /// their own message.
    pub fn context(self, context: &'static str) -> Self {
        match self {
            AppError::DatabaseError(err) => AppError::DatabaseError(err.context(context)),
            AppError::InternalError(err) => AppError::InternalError(err.context(context)),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::InvalidId(_)
            | AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            status_code: Option<u16>,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let status = self.status_code();

        let (message, status_code, details) = match self {
            AppError::ValidationError(err) => (
                "Invalid input data".to_string(),
                None,
                Some(err.to_string()),
            ),
            AppError::BadRequest(err) => (err.to_string(), None, None),
            AppError::NotFound(err) => (err.to_string(), None, None),
            AppError::InvalidId(id) => (format!("Invalid item id: {:?}", id), None, None),
            AppError::Upstream { status, body } => (
                "Error fetching data from product search API".to_string(),
                Some(status),
                Some(body),
            ),
            AppError::InternalError(err) | AppError::DatabaseError(err) => {
                tracing::error!(error = %format!("{:#}", err), "Request failed");
                (format!("{:#}", err), None, None)
            }
            AppError::ConfigError(err) => (
                "Configuration error".to_string(),
                None,
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                message,
                status_code,
                details,
            }),
        )
            .into_response()
    }
}
