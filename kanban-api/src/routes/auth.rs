/// Authentication endpoints
///
/// This module provides session management:
/// - Registration
/// - Login (sets the session cookie and returns the token)
/// - Logout (expires the session cookie)
/// - Current session
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a session
/// - `POST /api/auth/logout` - End the session
/// - `GET /api/auth/me` - Current user (requires a session)

use super::MessageResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, Extension, Json};
use kanban_shared::{
    auth::{
        jwt::{self, Claims},
        middleware::{clear_session_cookie, session_cookie, AuthContext},
        password,
    },
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    #[serde(default)]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be at least 6 characters"
    ))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[serde(default)]
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,

    /// Session token, also set as the `token` cookie
    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "name": "Ana", "email": "ana@example.com", "password": "secret1" }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 1, "name": "Ana", "email": "ana@example.com" }`
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    req.name = req.name.trim().to_string();
    req.email = req.email.trim().to_lowercase();
    req.validate()?;

    let email = req.email;

    if User::email_taken(&state.db, &email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

/// Login with email and password
///
/// Issues a session token, returned in the body and set as an `HttpOnly`
/// cookie whose lifetime matches the token.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = User::find_by_email(&state.db, req.email.trim().to_lowercase().as_str())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid());
    }

    let claims = Claims::with_expiration(user.id, &user.email, &user.name, state.config.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;
    let cookie = session_cookie(&token, claims.remaining_seconds(), state.config.api.production);

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

/// Expires the session cookie
///
/// Bearer tokens stay valid until they expire; there is no server-side
/// session to revoke.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.config.api.production),
        )],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Current user, read fresh from the store
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthenticated".to_string()))?;

    Ok(Json(user))
}
