//! Type-safe error codes for API responses.
//!
//! Each error code has:
//! - a string identifier for clients (e.g., "NOT_FOUND")
//! - an integer code for logging and monitoring (e.g., 1004)
//! - a default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1004);
//! assert_eq!(code.default_message(), "Resource not found");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Invalid identifier in path parameter
    InvalidId,

    /// Malformed request that does not fit a more specific code
    BadRequest,

    /// Requested resource was not found
    NotFound,

    /// HTTP method not supported by the resource
    MethodNotAllowed,

    /// JSON extraction from request body failed
    JsonExtraction,

    // Server errors
    /// An unexpected internal server error occurred
    InternalError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidId => "INVALID_ID",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Integer code for logging, metrics and alerting.
    ///
    /// Ranges:
    /// - 1000-1099: client errors
    /// - 1100-1199: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::MethodNotAllowed => 1006,
            Self::InternalError => 1100,
        }
    }

    /// Default human-readable message
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidId => "Invalid identifier format",
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::JsonExtraction => "Failed to parse request body",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
