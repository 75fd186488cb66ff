/// Workspace endpoints
///
/// Workspaces are listed and created for the caller; every other operation
/// requires the caller to own the workspace.
///
/// # Endpoints
///
/// - `GET /api/workspaces` - Caller's workspaces, newest first
/// - `POST /api/workspaces` - Create a workspace
/// - `GET /api/workspaces/:id` - One workspace
/// - `PATCH /api/workspaces/:id` - Rename or change the image
/// - `DELETE /api/workspaces/:id` - Delete with all boards, lists and cards

use super::MessageResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    auth::{
        authorization::{parse_entity_id, require_owner, EntityRef},
        middleware::AuthContext,
    },
    models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace},
};
use serde::Deserialize;
use validator::Validate;

/// Create workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Parses the path id and checks the caller owns the workspace
async fn owned_workspace(state: &AppState, auth: &AuthContext, raw_id: &str) -> ApiResult<i32> {
    let id = parse_entity_id(raw_id)?;
    require_owner(&state.db, auth, EntityRef::Workspace(id)).await?;
    Ok(id)
}

pub async fn list_workspaces(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Workspace>>> {
    let workspaces = Workspace::list_by_owner(&state.db, auth.user_id).await?;
    Ok(Json(workspaces))
}

pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(mut req): Json<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    req.name = req.name.trim().to_string();
    req.validate()?;

    let workspace = Workspace::create(
        &state.db,
        CreateWorkspace {
            name: req.name,
            image_url: req.image_url,
            owner_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(workspace_id = workspace.id, owner_id = auth.user_id, "Workspace created");

    Ok((StatusCode::CREATED, Json(workspace)))
}

pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Workspace>> {
    let id = owned_workspace(&state, &auth, &id).await?;

    let workspace = Workspace::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("workspace {} not found", id)))?;

    Ok(Json(workspace))
}

/// Partial update; `"image_url": null` clears the image
pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(update): Json<UpdateWorkspace>,
) -> ApiResult<Json<Workspace>> {
    let id = owned_workspace(&state, &auth, &id).await?;

    if update.is_empty() {
        return Err(ApiError::no_fields_to_update());
    }
    let update = update.trimmed();
    update.validate()?;

    let workspace = Workspace::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("workspace {} not found", id)))?;

    Ok(Json(workspace))
}

pub async fn delete_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = owned_workspace(&state, &auth, &id).await?;

    if !Workspace::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("workspace {} not found", id)));
    }

    tracing::info!(workspace_id = id, "Workspace deleted");

    Ok(Json(MessageResponse::new("Workspace deleted successfully")))
}
