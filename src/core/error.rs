//! Typed error handling for the gateway
//!
//! Every route returns a [`GatewayResult`]. Failures are rendered as a JSON
//! body `{ "code": ..., "message": ... }` with a matching HTTP status, so
//! clients can tell a malformed identifier from a storage outage.
//!
//! # Error Categories
//!
//! - [`RequestError`]: Errors caused by the incoming request (bad id, body or parameters)
//! - [`StorageError`]: Errors raised by the storage backend
//! - [`ConfigError`]: Errors raised while loading the process configuration
//!
//! A record that does not exist is *not* an error: get-by-id answers `null`
//! and delete answers a zero count.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Errors caused by the request itself
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Request(e) => e.status_code(),
            GatewayError::Storage(e) => e.status_code(),
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Request(e) => e.error_code(),
            GatewayError::Storage(e) => e.error_code(),
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by the incoming request
#[derive(Debug, Error)]
pub enum RequestError {
    /// Path segment is not a 24-character hex ObjectId
    #[error("Invalid toy id '{id}': {message}")]
    InvalidToyId { id: String, message: String },

    /// Body is not a JSON object
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Path segment or query string could not be decoded
    #[error("Invalid request parameters: {message}")]
    InvalidParameter { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidToyId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidToyId { .. } => "INVALID_TOY_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidParameter { .. } => "INVALID_PARAMETER",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or failed the query
    #[error("{backend} {operation} failed: {message}")]
    QueryFailed {
        backend: &'static str,
        operation: &'static str,
        message: String,
    },

    /// The backend could not be reached
    #[error("Storage backend '{backend}' is unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::QueryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QueryFailed { .. } => "STORAGE_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the configuration file
    #[error("Failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    /// Configuration file is not valid YAML for [`AppConfig`](crate::config::AppConfig)
    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    /// An environment variable holds an unusable value
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// Neither a connection string nor credentials were provided
    #[error("Missing database credentials: set MONGODB_URI or DB_USER and DB_PASS")]
    MissingCredentials,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
