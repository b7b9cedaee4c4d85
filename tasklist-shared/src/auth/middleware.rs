/// Session authentication
///
/// Resolves the session token found in a request into an [`AuthContext`].
/// The web server's auth gate calls [`authenticate`] for every protected
/// route and inserts the resulting context into request extensions, where
/// handlers pick it up with Axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use tasklist_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use super::session::session_token;
use crate::models::user::User;

/// Identity of the user making the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username, for display
    pub username: String,
}

impl AuthContext {
    /// Creates auth context for a resolved user
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Error type for session authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie on the request
    #[error("Missing session")]
    MissingSession,

    /// Session token failed validation
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Token is valid but its user no longer exists
    #[error("Session user {0} does not exist")]
    UnknownUser(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AuthError {
    /// Whether the request carried a session cookie that must be discarded
    pub fn has_stale_cookie(&self) -> bool {
        matches!(self, AuthError::InvalidSession(_) | AuthError::UnknownUser(_))
    }
}

/// Resolves the session carried by `headers`
///
/// # Errors
///
/// - `MissingSession` if there is no session cookie
/// - `InvalidSession` if the token is malformed, forged, expired or was
///   revoked by a logout
/// - `UnknownUser` if the token's user has been removed
/// - `DatabaseError` if the user lookup fails
pub async fn authenticate(
    pool: &PgPool,
    headers: &HeaderMap,
    secret: &str,
) -> Result<AuthContext, AuthError> {
    let token = session_token(headers).ok_or(AuthError::MissingSession)?;
    let claims = verify_session_token(token, secret)?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::UnknownUser(claims.sub))?;

    if user.session_epoch != claims.sep {
        return Err(AuthError::InvalidSession("Session revoked".to_string()));
    }

    Ok(AuthContext::from_user(&user))
}

/// Validates the token and returns its claims
pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidSession("Session expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidSession("Invalid issuer".to_string()),
        other => AuthError::InvalidSession(other.to_string()),
    })?;

    Ok(claims)
}
