// Import Axum types for HTTP response conversion
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::HtmlEscape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub field: String,
    pub message: String,
}

impl ValidationErrors {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A validation error with field-level details.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object storage transport or service failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Chat completion API failure.
    #[error("Completion error: {0}")]
    Completion(String),

    /// A template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a single-field validation error.
    pub fn validation(field: &str, message: &str) -> Self {
        Error::Validation(ValidationErrors::new(field, message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::BAD_GATEWAY,
            Error::Completion(_) => StatusCode::BAD_GATEWAY,
            Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a visitor. Transport details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(errors) => errors.message.clone(),
            Error::NotFound(msg) => msg.clone(),
            Error::Storage(_) => "File storage is unavailable, please try again later".to_string(),
            Error::Completion(_) => "The chat service failed to reply, please try again later".to_string(),
            Error::Sqlx(_) | Error::Migrate(_) => "Database error".to_string(),
            Error::Template(_) => "Failed to render page".to_string(),
            Error::Config(_) => "Configuration error".to_string(),
        }
    }
}

/// Convert custom Error to HTTP response
///
/// Each variant maps to a status code and a minimal HTML page carrying the
/// public message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = format!(
            "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{code}</title></head>\
             <body><h1>{code}</h1><p class=\"error\">{message}</p><p><a href=\"/\">Back to list</a></p></body></html>",
            code = status,
            message = HtmlEscape(&self.public_message()),
        );

        (status, Html(body)).into_response()
    }
}
