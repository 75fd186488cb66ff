/// Account deletion
///
/// `DELETE /api/users/:id` removes the caller's own account. Workspaces,
/// boards, lists and cards go with it by cascade.

use super::MessageResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use kanban_shared::{
    auth::{
        authorization::parse_entity_id,
        middleware::{clear_session_cookie, AuthContext},
    },
    models::user::User,
};

/// Deletes the caller's account and expires the session cookie
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `403 Forbidden`: Id is not the caller's
/// - `404 Not Found`: Account already gone
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_entity_id(&id)?;

    if id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own account".to_string(),
        ));
    }

    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "User deleted");

    Ok((
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.config.api.production),
        )],
        Json(MessageResponse::new("User deleted successfully")),
    ))
}
