use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use validator::ValidationError;

use crate::models::responses::DefaultResponse;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("{}", validation_message(.0))]
    Validation(ValidationError),
    #[error("{0}")]
    Parse(String),
    #[error("invalid sort column")]
    InvalidSortColumn(String),
    #[error("customer {0} not found")]
    NotFound(i64),
    #[error("edit conflict: customer has been modified by another user")]
    EditConflict,
    #[error("email already exists")]
    EmailTaken,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

fn validation_message(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => err.code.to_string(),
    }
}

impl From<sqlx::Error> for CustomerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return CustomerError::EmailTaken;
            }
        }

        CustomerError::Database(err)
    }
}

impl CustomerError {
    pub fn status(&self) -> StatusCode {
        match self {
            CustomerError::Validation(_)
            | CustomerError::Parse(_)
            | CustomerError::InvalidSortColumn(_)
            | CustomerError::EmailTaken => StatusCode::BAD_REQUEST,
            CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomerError::EditConflict | CustomerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Renders the error as a JSON body headed by `message`.
    pub fn into_response_with(self, message: &str) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "{}", message);
        } else {
            tracing::debug!(error = %self, "{}", message);
        }

        // driver details stay in the log
        let detail = match &self {
            CustomerError::Database(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let body = DefaultResponse::error(message, detail).into_json();

        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("server failed: {0}")]
    Server(#[from] hyper::Error),
}
