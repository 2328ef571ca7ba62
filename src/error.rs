//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the error conditions that can occur, from database issues to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly convert
//! application errors into HTTP responses. Validation failures and rejected login
//! credentials share one wire shape (400 with a generic payload) so a caller cannot
//! tell a malformed request apart from a wrong password. Unauthorized (401) and
//! NotFound (404) responses carry empty bodies.
//!
//! `From` trait implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow conversion with
//! the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant carries a message describing the issue. The message is used for
/// logging and `Display`; whether it reaches the wire depends on the variant.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unrecognized session token on a protected route (HTTP 401).
    /// The response body is always empty.
    Unauthorized(String),
    /// Rejected login credentials (HTTP 400). Unknown email and wrong password
    /// both map here and produce the same response as `Validation`.
    Authentication(String),
    /// Failed input validation, including duplicate email on signup (HTTP 400).
    Validation(String),
    /// Requested resource missing, malformed id, or owned by another user
    /// (HTTP 404). The response body is always empty.
    NotFound(String),
    /// An error originating from the storage layer (HTTP 500).
    /// Wraps errors from the `sqlx` crate; the detail stays out of the response.
    Database(String),
    /// An unexpected server-side error such as a hashing or signing failure
    /// (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation lets Actix Web translate `AppError` results from handlers
/// and middleware into the correct HTTP status codes and bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().finish(),
            AppError::NotFound(_) => HttpResponse::NotFound().finish(),
            // Same status and shape for both: bad input and bad credentials
            // must be indistinguishable to the caller.
            AppError::Authentication(msg) | AppError::Validation(msg) => {
                HttpResponse::BadRequest().json(json!({
                    "error": msg
                }))
            }
            // Storage detail is logged where the error is converted, never sent.
            AppError::Database(_) => HttpResponse::InternalServerError().json(json!({
                "error": "database error"
            })),
            AppError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; every other database
/// error becomes `AppError::Database` and is logged here, since the response
/// body carries no detail.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            _ => {
                log::error!("storage failure: {}", error);
                AppError::Database(error.to_string())
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// A token that fails to decode can never resolve to a stored session.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
