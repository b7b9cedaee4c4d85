/// Route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Login, registration and logout
/// - `tasks`: Task list, detail, create, update and delete

pub mod auth;
pub mod health;
pub mod tasks;

use crate::error::AppError;
use axum::{
    http::{header, HeaderValue},
    response::Response,
};

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}

/// Appends a `Set-Cookie` header to `response`
pub fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Refusing to send malformed cookie"),
    }
    response
}
