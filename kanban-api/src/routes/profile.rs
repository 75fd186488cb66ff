/// Profile endpoints for the signed-in user
///
/// - `GET /api/auth/profile` - Current profile
/// - `PATCH /api/auth/profile` - Change name, email and optionally password
/// - `POST /api/auth/profile/photo` - Set the profile image URL

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use kanban_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile update request
///
/// A password change needs both `currentPassword` and `newPassword`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub current_password: Option<String>,

    #[serde(default)]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be at least 6 characters"
    ))]
    pub new_password: Option<String>,
}

/// Photo update request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,
}

/// Photo update response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoResponse {
    pub message: String,
    pub image_url: String,
}

async fn current_user(state: &AppState, auth: &AuthContext) -> ApiResult<User> {
    User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    Ok(Json(current_user(&state, &auth).await?))
}

/// Updates the caller's name and email, and the password when asked
///
/// # Errors
///
/// - `400 Bad Request`: New password without the current one
/// - `401 Unauthorized`: Current password is wrong
/// - `409 Conflict`: Email is already taken by another user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(mut req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.name = req.name.trim().to_string();
    req.email = req.email.trim().to_lowercase();
    req.validate()?;

    let user = current_user(&state, &auth).await?;
    let email = req.email;

    if email != user.email && User::email_taken(&state.db, &email, Some(user.id)).await? {
        return Err(ApiError::Conflict("Email is already taken".to_string()));
    }

    let password_hash = match req.new_password.as_deref() {
        Some(new_password) => {
            let current = req.current_password.as_deref().ok_or_else(|| {
                ApiError::BadRequest("Current password is required".to_string())
            })?;

            if !password::verify_password(current, &user.password_hash)? {
                return Err(ApiError::Unauthorized(
                    "Current password is incorrect".to_string(),
                ));
            }

            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        user.id,
        UpdateUser {
            name: Some(req.name),
            email: Some(email),
            password_hash,
            profile_image: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(updated))
}

/// Sets the profile image to an already-hosted URL
pub async fn update_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdatePhotoRequest>,
) -> ApiResult<Json<UpdatePhotoResponse>> {
    req.validate()?;

    let updated = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            profile_image: Some(Some(req.image_url)),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UpdatePhotoResponse {
        message: "Profile photo updated".to_string(),
        image_url: updated.profile_image.unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_camel_case() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"name": "Ana", "email": "ana@example.com", "currentPassword": "old-pass", "newPassword": "new-pass"}"#,
        )
        .unwrap();

        assert_eq!(req.current_password.as_deref(), Some("old-pass"));
        assert_eq!(req.new_password.as_deref(), Some("new-pass"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_profile_request_short_new_password() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"name": "Ana", "email": "ana@example.com", "newPassword": "abc"}"#,
        )
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_update_photo_requires_url() {
        let bad: UpdatePhotoRequest = serde_json::from_str(r#"{"imageUrl": "not a url"}"#).unwrap();
        assert!(bad.validate().is_err());

        let good: UpdatePhotoRequest =
            serde_json::from_str(r#"{"imageUrl": "https://cdn.example.com/ana.png"}"#).unwrap();
        assert!(good.validate().is_ok());
    }
}
