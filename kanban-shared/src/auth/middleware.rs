/// Caller identity extraction
///
/// A request is authenticated by a session token found either in an
/// `Authorization: Bearer <token>` header or in the `token` cookie. The header
/// wins when both are present. The API's auth layer calls [`authenticate`]
/// and inserts the resulting [`AuthContext`] into the request extensions, so
/// handlers receive it explicitly through `Extension<AuthContext>`; nothing
/// about the caller is kept in global state.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use kanban_shared::auth::jwt::{create_token, Claims};
/// use kanban_shared::auth::middleware::authenticate;
///
/// let secret = "an-example-secret-that-is-32-bytes!!";
/// let token = create_token(&Claims::new(7, "ana@example.com", "Ana"), secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, HeaderValue::from_str(&format!("token={}", token)).unwrap());
///
/// let auth = authenticate(&headers, secret).unwrap();
/// assert_eq!(auth.user_id, 7);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Authenticated caller, injected into every protected handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i32,

    /// Email carried by the session token
    pub email: String,

    /// Display name carried by the session token
    pub name: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Authentication failures, all of which mean "Unauthenticated" to the caller
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither a bearer header nor a session cookie was sent
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token was present but failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

/// Finds the session token in the request headers
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}

/// Resolves the caller identity from request headers
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingCredentials)?;
    let claims = validate_token(token, secret)?;

    Ok(AuthContext::from_claims(claims))
}

/// `Set-Cookie` value storing a session token
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value expiring the session cookie immediately
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
