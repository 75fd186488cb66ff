/// Integration tests for ownership resolution
///
/// These tests require a running PostgreSQL database.

mod common;

use common::{setup_pool, Fixture};
use kanban_shared::auth::authorization::{require_owner, resolve_owner, AuthzError, EntityRef};
use kanban_shared::auth::middleware::AuthContext;
use kanban_shared::models::board::Board;
use kanban_shared::models::workspace::Workspace;

fn caller(fixture: &Fixture) -> AuthContext {
    AuthContext {
        user_id: fixture.user.id,
        email: fixture.user.email.clone(),
        name: fixture.user.name.clone(),
    }
}

#[tokio::test]
async fn test_resolve_owner_through_chain() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "To do").await;
    let card = fixture.add_card(&pool, list.id, "Write tests").await;

    for entity in [
        EntityRef::Workspace(fixture.workspace.id),
        EntityRef::Board(fixture.board.id),
        EntityRef::List(list.id),
        EntityRef::Card(card.id),
    ] {
        let owner = resolve_owner(&pool, entity).await.unwrap();
        assert_eq!(owner, fixture.user.id, "owner of {}", entity);
    }

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_require_owner_forbidden_for_other_user() {
    let pool = setup_pool().await;
    let owner = Fixture::new(&pool).await;
    let intruder = Fixture::new(&pool).await;
    let list = owner.add_list(&pool, "Private").await;
    let card = owner.add_card(&pool, list.id, "Secret").await;

    let result = require_owner(&pool, &caller(&intruder), EntityRef::Card(card.id)).await;
    assert!(matches!(result, Err(AuthzError::Forbidden(EntityRef::Card(_)))));

    assert!(require_owner(&pool, &caller(&owner), EntityRef::Card(card.id)).await.is_ok());

    owner.cleanup(&pool).await;
    intruder.cleanup(&pool).await;
}

#[tokio::test]
async fn test_resolve_owner_not_found() {
    let pool = setup_pool().await;

    let result = resolve_owner(&pool, EntityRef::Card(i32::MAX)).await;
    assert!(matches!(result, Err(AuthzError::NotFound(EntityRef::Card(i32::MAX)))));
}

#[tokio::test]
async fn test_ownership_vanishes_with_cascade() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "Doomed").await;

    assert!(Board::delete(&pool, fixture.board.id).await.unwrap());

    let result = resolve_owner(&pool, EntityRef::List(list.id)).await;
    assert!(matches!(result, Err(AuthzError::NotFound(_))));

    assert!(Workspace::find_by_id(&pool, fixture.workspace.id).await.unwrap().is_some());

    fixture.cleanup(&pool).await;
}
