/// Card endpoints
///
/// Cards are ordered within their list. The single-card PATCH is what a
/// client issues after dropping a card on another list: it sets `list_id`
/// and `position` directly and leaves every other card where it was.
///
/// # Endpoints
///
/// - `GET /api/lists/:id/cards` - Cards of a list in display order
/// - `POST /api/lists/:id/cards` - Append a card
/// - `PATCH /api/lists/:id/cards/positions` - Assign explicit placements
/// - `PATCH /api/cards/:id` - Edit and/or move one card
/// - `DELETE /api/cards/:id` - Delete

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
    models::card::{Card, UpdateCard},
    position::{self, check_position, Container, Item, Placement},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Create card request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of the bulk card placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlacement {
    pub id: i32,
    pub position: i32,
    pub list_id: i32,
}

impl From<CardPlacement> for Placement {
    fn from(p: CardPlacement) -> Self {
        Placement {
            id: p.id,
            parent_id: p.list_id,
            position: p.position,
        }
    }
}

/// Bulk card placement request
///
/// ```json
/// { "cards": [{ "id": 5, "position": 0, "list_id": 2 }] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderCardsRequest {
    pub cards: Vec<CardPlacement>,
}

pub async fn list_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    let list_id = parse_entity_id(&list_id)?;
    require_owner(&state.db, &auth, EntityRef::List(list_id)).await?;

    let cards = Card::list_by_list(&state.db, list_id).await?;
    Ok(Json(cards))
}

/// Appends a card after the list's current last card
pub async fn create_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<String>,
    Json(mut req): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    let list_id = parse_entity_id(&list_id)?;
    req.title = req.title.trim().to_string();
    req.validate()?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::List(list_id)).await?;

    let position = position::append(&mut tx, Container::List(list_id)).await?;
    let card = Card::insert(
        &mut *tx,
        list_id,
        &req.title,
        req.description.as_deref(),
        position,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(card_id = card.id, list_id, position, "Card created");

    Ok((StatusCode::CREATED, Json(card)))
}

/// Applies explicit `{id, position, list_id}` placements to the list's cards
///
/// Entries naming a card outside this list are skipped. Every destination
/// list must be owned by the caller.
pub async fn reorder_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<String>,
    Json(req): Json<ReorderCardsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let list_id = parse_entity_id(&list_id)?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::List(list_id)).await?;

    let destinations: BTreeSet<i32> = req
        .cards
        .iter()
        .map(|c| c.list_id)
        .filter(|&id| id != list_id)
        .collect();
    for destination in destinations {
        require_owner(&mut *tx, &auth, EntityRef::List(destination)).await?;
    }

    let placements: Vec<Placement> = req.cards.into_iter().map(Placement::from).collect();
    let updated = position::assign_positions(&mut tx, Container::List(list_id), &placements).await?;

    tx.commit().await?;

    tracing::debug!(list_id, updated, "Card positions assigned");

    Ok(Json(MessageResponse::new("Card positions updated successfully")))
}

/// Partial update of one card
///
/// Recognized fields are `title`, `description`, `position` and `list_id`.
/// `"description": null` clears the description. Moving to another list
/// requires owning that list too; source and destination siblings keep
/// their positions.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id, no recognized field, position out of range
/// - `403 Forbidden`: Card or destination list belongs to another user
/// - `404 Not Found`: Card or destination list does not exist
pub async fn update_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(update): Json<UpdateCard>,
) -> ApiResult<Json<Card>> {
    let id = parse_entity_id(&id)?;

    let mut tx = state.db.begin().await?;
    require_owner(&mut *tx, &auth, EntityRef::Card(id)).await?;

    if update.is_empty() {
        return Err(ApiError::no_fields_to_update());
    }
    let update = update.trimmed();
    if let Some(position) = update.position {
        check_position(position)?;
    }
    update.validate()?;

    if let Some(list_id) = update.list_id {
        require_owner(&mut *tx, &auth, EntityRef::List(list_id)).await?;
    }

    if update.moves() {
        position::move_single(&mut tx, Item::Card(id), update.list_id, update.position).await?;
    }

    let card = if update.title.is_some() || update.description.is_some() {
        Card::update_details(&mut *tx, id, update.title, update.description).await?
    } else {
        Card::find_by_id(&mut *tx, id).await?
    }
    .ok_or_else(|| ApiError::NotFound(format!("card {} not found", id)))?;

    tx.commit().await?;

    Ok(Json(card))
}

/// Deletes a card; the remaining cards keep their positions
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_entity_id(&id)?;
    require_owner(&state.db, &auth, EntityRef::Card(id)).await?;

    if !Card::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("card {} not found", id)));
    }

    tracing::info!(card_id = id, "Card deleted");

    Ok(Json(MessageResponse::new("Card deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_placement_into_placement() {
        let placement = Placement::from(CardPlacement {
            id: 5,
            position: 2,
            list_id: 9,
        });

        assert_eq!(
            placement,
            Placement {
                id: 5,
                parent_id: 9,
                position: 2
            }
        );
    }

    #[test]
    fn test_reorder_cards_request_parses() {
        let req: ReorderCardsRequest = serde_json::from_str(
            r#"{"cards": [{"id": 1, "position": 0, "list_id": 4}, {"id": 2, "position": 1, "list_id": 4}]}"#,
        )
        .unwrap();

        assert_eq!(req.cards.len(), 2);
        assert_eq!(req.cards[1].position, 1);
    }
}
