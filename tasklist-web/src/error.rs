/// Error handling for the web server
///
/// Handlers return `Result<T, AppError>`; each variant maps to a status code
/// and an HTML page (or a redirect to the login page).
///
/// Form validation failures are not errors here: the handler redisplays the
/// form with status 422 itself, since only it knows which form to render.
///
/// # Example
///
/// ```no_run
/// use tasklist_web::error::{AppError, AppResult};
/// use axum::response::Html;
///
/// async fn handler(pool: sqlx::PgPool) -> AppResult<Html<String>> {
///     let (n,): (i64,) = sqlx::query_as("SELECT 1::BIGINT").fetch_one(&pool).await?;
///     Ok(Html(n.to_string()))
/// }
/// ```

use crate::views::errors::{forbidden_page, internal_error_page, not_found_page};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::fmt;
use tasklist_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};

/// Where unauthenticated requests are sent
pub const LOGIN_URL: &str = "/login/";

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Unified web error type
#[derive(Debug)]
pub enum AppError {
    /// No valid session (303 to the login page)
    Unauthenticated,

    /// Authenticated but not allowed (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::SEE_OTHER,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::Unauthenticated => Redirect::to(LOGIN_URL).into_response(),
            AppError::Forbidden(_) => (status, Html(forbidden_page())).into_response(),
            AppError::NotFound(_) => (status, Html(not_found_page())).into_response(),
            AppError::InternalError(msg) => {
                // Details stay in the logs
                tracing::error!(error = %msg, "Internal error");
                (status, Html(internal_error_page())).into_response()
            }
        }
    }
}

/// Convert sqlx errors to web errors
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert session errors to web errors
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSession | AuthError::InvalidSession(_) | AuthError::UnknownUser(_) => {
                AppError::Unauthenticated
            }
            AuthError::DatabaseError(e) => AppError::InternalError(format!("Database error: {}", e)),
        }
    }
}

/// Convert ownership errors to web errors
impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            AuthzError::NotOwner => {
                AppError::Forbidden("Not authorized to access this task".to_string())
            }
            AuthzError::DatabaseError(e) => AppError::InternalError(format!("Database error: {}", e)),
        }
    }
}

/// Convert password errors to web errors
impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session token errors to web errors
impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::InternalError(format!("Session token error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("Task 3 not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task 3 not found");

        assert_eq!(AppError::Unauthenticated.to_string(), "Unauthenticated");
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = AppError::Unauthenticated.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_URL);
    }

    #[test]
    fn test_response_status_matches_status_code() {
        for err in [
            AppError::Unauthenticated,
            AppError::Forbidden(String::new()),
            AppError::NotFound(String::new()),
            AppError::InternalError("boom".to_string()),
        ] {
            let expected = err.status_code();
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Forbidden(String::new()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound(String::new()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_authz_errors() {
        assert!(matches!(AppError::from(AuthzError::NotOwner), AppError::Forbidden(_)));
        assert!(matches!(AppError::from(AuthzError::NotFound(1)), AppError::NotFound(_)));
    }

    #[test]
    fn test_auth_errors() {
        assert!(matches!(
            AppError::from(AuthError::MissingSession),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from(AuthError::InvalidSession("expired".to_string())),
            AppError::Unauthenticated
        ));
    }

    #[test]
    fn test_sqlx_errors() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::InternalError(_)
        ));
    }
}
