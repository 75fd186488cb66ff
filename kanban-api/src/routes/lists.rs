/// List endpoints
///
/// Lists are ordered within their board. Creating a list appends it; the
/// reorder endpoints either move one list by direct assignment or
/// re-sequence the whole board.
///
/// # Endpoints
///
/// - `GET /api/boards/:id/lists` - Lists of a board in display order
/// - `POST /api/boards/:id/lists` - Append a list
/// - `PATCH /api/boards/:id/lists/positions` - Re-sequence every list
/// - `PATCH /api/lists/:id` - Rename and/or move one list
/// - `DELETE /api/lists/:id` - Delete with its cards

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
    models::list::{List, UpdateList},
    position::{self, check_position, Container, Item},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create list request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
}

/// Bulk list reorder request
///
/// ```json
/// { "listOrder": [7, 3, 5] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderListsRequest {
    pub list_order: Vec<i32>,
}

pub async fn list_lists(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<String>,
) -> ApiResult<Json<Vec<List>>> {
    let board_id = parse_entity_id(&board_id)?;
    require_owner(&state.db, &auth, EntityRef::Board(board_id)).await?;

    let lists = List::list_by_board(&state.db, board_id).await?;
    Ok(Json(lists))
}

/// Appends a list after the board's current last list
pub async fn create_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<String>,
    Json(mut req): Json<CreateListRequest>,
) -> ApiResult<(StatusCode, Json<List>)> {
    let board_id = parse_entity_id(&board_id)?;
    req.title = req.title.trim().to_string();
    req.validate()?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::Board(board_id)).await?;

    let position = position::append(&mut tx, Container::Board(board_id)).await?;
    let list = List::insert(&mut *tx, board_id, &req.title, position).await?;

    tx.commit().await?;

    tracing::info!(list_id = list.id, board_id, position, "List created");

    Ok((StatusCode::CREATED, Json(list)))
}

/// Re-sequences the board's lists to `0..n-1` in the given order
///
/// # Errors
///
/// - `400 Bad Request`: An id is not on this board or appears twice
/// - `403 Forbidden`: Board belongs to another user
pub async fn reorder_lists(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<String>,
    Json(req): Json<ReorderListsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let board_id = parse_entity_id(&board_id)?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::Board(board_id)).await?;

    let applied = position::reorder_all(&mut tx, Container::Board(board_id), &req.list_order).await?;

    tx.commit().await?;

    tracing::debug!(board_id, lists = applied.len(), "Lists reordered");

    Ok(Json(MessageResponse::new("List positions updated successfully")))
}

/// Partial update of one list
///
/// Recognized fields are `title`, `position` and `board_id`. Moving to
/// another board requires owning that board too. The move is a direct
/// assignment: sibling lists keep their positions.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id, no recognized field, position out of range
/// - `403 Forbidden`: List or destination board belongs to another user
/// - `404 Not Found`: List or destination board does not exist
pub async fn update_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(update): Json<UpdateList>,
) -> ApiResult<Json<List>> {
    let id = parse_entity_id(&id)?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::List(id)).await?;

    if update.is_empty() {
        return Err(ApiError::no_fields_to_update());
    }
    let update = update.trimmed();
    if let Some(position) = update.position {
        check_position(position)?;
    }
    update.validate()?;

    if let Some(board_id) = update.board_id {
        require_owner(&mut *tx, &auth, EntityRef::Board(board_id)).await?;
    }

    if update.moves() {
        position::move_single(&mut tx, Item::List(id), update.board_id, update.position).await?;
    }

    let list = match update.title.as_deref() {
        Some(title) => List::rename(&mut *tx, id, title).await?,
        None => List::find_by_id(&mut *tx, id).await?,
    }
    .ok_or_else(|| ApiError::NotFound(format!("list {} not found", id)))?;

    tx.commit().await?;

    Ok(Json(list))
}

/// Deletes a list; the remaining lists keep their positions
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_entity_id(&id)?;
    require_owner(&state.db, &auth, EntityRef::List(id)).await?;

    if !List::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("list {} not found", id)));
    }

    tracing::info!(list_id = id, "List deleted");

    Ok(Json(MessageResponse::new("List deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_lists_request_field_name() {
        let req: ReorderListsRequest = serde_json::from_str(r#"{"listOrder": [3, 1, 2]}"#).unwrap();
        assert_eq!(req.list_order, vec![3, 1, 2]);

        assert!(serde_json::from_str::<ReorderListsRequest>(r#"{"list_order": [1]}"#).is_err());
    }

    #[test]
    fn test_create_list_request_requires_title() {
        let req: CreateListRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
