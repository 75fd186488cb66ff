/// Session token issuance and validation
///
/// Session tokens are HS256 JWTs carrying the caller identity. They travel
/// either in an `Authorization: Bearer` header or in the `token` cookie set
/// at login.
///
/// # Claims
///
/// ```json
/// {
///   "id": 42,
///   "email": "ana@example.com",
///   "name": "Ana",
///   "iss": "kanban",
///   "iat": 1735689600,
///   "exp": 1735776000
/// }
/// ```
///
/// # Example
///
/// ```
/// use kanban_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// let secret = "an-example-secret-that-is-32-bytes!!";
/// let claims = Claims::new(42, "ana@example.com", "Ana");
/// let token = create_token(&claims, secret).unwrap();
///
/// let validated = validate_token(&token, secret).unwrap();
/// assert_eq!(validated.id, 42);
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "kanban";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, issuer or structure rejected
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i32,

    /// User email at issuance time
    pub email: String,

    /// Display name at issuance time
    pub name: String,

    /// Issuer, always "kanban"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Lifetime of a session when none is configured
    pub fn default_ttl() -> Duration {
        Duration::hours(24)
    }

    /// Claims for a session of the default lifetime
    pub fn new(user_id: i32, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_expiration(user_id, email, name, Self::default_ttl())
    }

    /// Claims expiring `expires_in` from now
    ///
    /// A negative duration yields an already-expired token, which is handy in tests.
    pub fn with_expiration(
        user_id: i32,
        email: impl Into<String>,
        name: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: user_id,
            email: email.into(),
            name: name.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds left before expiry, `0` once expired
    ///
    /// Used as the cookie `Max-Age`.
    pub fn remaining_seconds(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// Signs claims into a compact token
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, issuer and expiry and returns the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
