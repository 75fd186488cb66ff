/// Board endpoints
///
/// # Endpoints
///
/// - `GET /api/workspaces/:id/boards` - Boards of a workspace, by id
/// - `POST /api/workspaces/:id/boards` - Create a board
/// - `GET /api/boards/:id` - One board
/// - `PATCH /api/boards/:id` - Rename
/// - `DELETE /api/boards/:id` - Delete with its lists and cards

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
    models::board::Board,
};
use serde::Deserialize;
use validator::Validate;

/// Body of board create and rename
#[derive(Debug, Deserialize, Validate)]
pub struct BoardRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
}

impl BoardRequest {
    fn name(&self) -> ApiResult<&str> {
        self.validate()?;
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::invalid_field("name", "Name is required"))
    }
}

pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(workspace_id): Path<String>,
) -> ApiResult<Json<Vec<Board>>> {
    let workspace_id = parse_entity_id(&workspace_id)?;
    require_owner(&state.db, &auth, EntityRef::Workspace(workspace_id)).await?;

    let boards = Board::list_by_workspace(&state.db, workspace_id).await?;
    Ok(Json(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(workspace_id): Path<String>,
    Json(req): Json<BoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let workspace_id = parse_entity_id(&workspace_id)?;
    require_owner(&state.db, &auth, EntityRef::Workspace(workspace_id)).await?;

    let board = Board::create(&state.db, workspace_id, req.name()?).await?;

    tracing::info!(board_id = board.id, workspace_id, "Board created");

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Board>> {
    let id = parse_entity_id(&id)?;
    require_owner(&state.db, &auth, EntityRef::Board(id)).await?;

    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("board {} not found", id)))?;

    Ok(Json(board))
}

pub async fn update_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(req): Json<BoardRequest>,
) -> ApiResult<Json<Board>> {
    let id = parse_entity_id(&id)?;
    require_owner(&state.db, &auth, EntityRef::Board(id)).await?;

    if req.name.is_none() {
        return Err(ApiError::no_fields_to_update());
    }

    let board = Board::rename(&state.db, id, req.name()?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("board {} not found", id)))?;

    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_entity_id(&id)?;
    require_owner(&state.db, &auth, EntityRef::Board(id)).await?;

    if !Board::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("board {} not found", id)));
    }

    tracing::info!(board_id = id, "Board deleted");

    Ok(Json(MessageResponse::new("Board deleted successfully")))
}
