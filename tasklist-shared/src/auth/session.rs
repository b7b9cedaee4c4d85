/// Session cookie handling
///
/// The session token travels in a single `HttpOnly` cookie. This module reads
/// it back out of request headers and builds the `Set-Cookie` values used to
/// start and end a session.

use axum::http::{header, HeaderMap};
use chrono::Duration;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "tasklist_session";

/// Finds the session token in the request's `Cookie` headers
///
/// Returns `None` when the cookie is absent or empty.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use tasklist_shared::auth::session::session_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; tasklist_session=abc.def"));
///
/// assert_eq!(session_token(&headers), Some("abc.def"));
/// ```
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Builds the `Set-Cookie` value that stores a new session token
///
/// `secure` adds the `Secure` attribute and should be set whenever the site
/// is served over HTTPS.
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds().max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", Duration::zero(), secure)
}
