/// Integration tests for the position engine
///
/// These tests require a running PostgreSQL database.

mod common;

use common::{setup_pool, Fixture};
use kanban_shared::models::card::Card;
use kanban_shared::models::list::List;
use kanban_shared::ordering::{OrderError, MAX_POSITION};
use kanban_shared::position::{
    append, assign_positions, move_single, reorder_all, Container, Item, Placement, PositionError,
};

#[tokio::test]
async fn test_append_positions() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "To do").await;

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(append(&mut conn, Container::List(list.id)).await.unwrap(), 0);
    drop(conn);

    let first = fixture.add_card(&pool, list.id, "First").await;
    let second = fixture.add_card(&pool, list.id, "Second").await;
    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);

    // Appending continues after the max, never fills gaps
    let mut tx = pool.begin().await.unwrap();
    move_single(&mut tx, Item::Card(second.id), None, Some(7)).await.unwrap();
    assert_eq!(append(&mut tx, Container::List(list.id)).await.unwrap(), 8);
    tx.rollback().await.unwrap();

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_append_near_position_limit() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "Crowded").await;
    let card = fixture.add_card(&pool, list.id, "Last").await;

    let mut tx = pool.begin().await.unwrap();

    // Direct moves stop at MAX_POSITION, appends may go past it
    let result = move_single(&mut tx, Item::Card(card.id), None, Some(i32::MAX)).await;
    assert!(matches!(result, Err(PositionError::PositionTooLarge(i32::MAX))));

    move_single(&mut tx, Item::Card(card.id), None, Some(MAX_POSITION)).await.unwrap();
    assert_eq!(
        append(&mut tx, Container::List(list.id)).await.unwrap(),
        MAX_POSITION + 1
    );

    // A container already at i32::MAX refuses instead of overflowing in SQL
    sqlx::query("UPDATE cards SET position = $1 WHERE id = $2")
        .bind(i32::MAX)
        .bind(card.id)
        .execute(&mut *tx)
        .await
        .unwrap();
    let result = append(&mut tx, Container::List(list.id)).await;
    assert!(matches!(result, Err(PositionError::ContainerFull(Container::List(id))) if id == list.id));

    tx.rollback().await.unwrap();
    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_append_missing_container() {
    let pool = setup_pool().await;
    let mut tx = pool.begin().await.unwrap();

    let result = append(&mut tx, Container::Board(i32::MAX)).await;
    assert!(matches!(result, Err(PositionError::ContainerNotFound(Container::Board(_)))));
}

#[tokio::test]
async fn test_concurrent_appends_get_distinct_positions() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "Busy").await;

    let (a, b) = tokio::join!(
        fixture.add_card(&pool, list.id, "A"),
        fixture.add_card(&pool, list.id, "B"),
    );

    let mut positions = vec![a.position, b.position];
    positions.sort();
    assert_eq!(positions, vec![0, 1]);

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_move_single_across_lists_leaves_gap() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let source = fixture.add_list(&pool, "Source").await;
    let target = fixture.add_list(&pool, "Target").await;

    let mut cards = Vec::new();
    for title in ["a", "b", "c", "d"] {
        cards.push(fixture.add_card(&pool, source.id, title).await);
    }
    fixture.add_card(&pool, target.id, "x").await;
    fixture.add_card(&pool, target.id, "y").await;

    let moved = &cards[2];
    let mut tx = pool.begin().await.unwrap();
    let placement = move_single(&mut tx, Item::Card(moved.id), Some(target.id), Some(2))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        placement,
        Placement {
            id: moved.id,
            parent_id: target.id,
            position: 2
        }
    );

    let card = Card::find_by_id(&pool, moved.id).await.unwrap().unwrap();
    assert_eq!((card.list_id, card.position), (target.id, 2));

    // Source keeps its gap at position 2
    let remaining: Vec<i32> = Card::list_by_list(&pool, source.id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.position)
        .collect();
    assert_eq!(remaining, vec![0, 1, 3]);

    assert!(!Fixture::card_ids(&pool, source.id).await.contains(&moved.id));
    assert!(Fixture::card_ids(&pool, target.id).await.contains(&moved.id));

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_move_single_rejects_negative_position() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "List").await;
    let card = fixture.add_card(&pool, list.id, "Card").await;

    let mut tx = pool.begin().await.unwrap();
    let result = move_single(&mut tx, Item::Card(card.id), None, Some(-1)).await;
    assert!(matches!(result, Err(PositionError::NegativePosition(-1))));
    drop(tx);

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_reorder_all_is_dense_and_ordered() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;

    let mut ids = Vec::new();
    for title in ["one", "two", "three", "four"] {
        ids.push(fixture.add_list(&pool, title).await.id);
    }

    let requested = vec![ids[3], ids[1], ids[0], ids[2]];
    let mut tx = pool.begin().await.unwrap();
    reorder_all(&mut tx, Container::Board(fixture.board.id), &requested)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let lists = List::list_by_board(&pool, fixture.board.id).await.unwrap();
    let read_back: Vec<(i32, i32)> = lists.iter().map(|l| (l.id, l.position)).collect();
    let expected: Vec<(i32, i32)> = requested.iter().copied().zip(0..).collect();
    assert_eq!(read_back, expected);

    fixture.cleanup(&pool).await;
}

#[tokio::test]
async fn test_reorder_all_rejects_foreign_ids_without_writing() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let other = Fixture::new(&pool).await;

    let mine = fixture.add_list(&pool, "Mine").await;
    let second = fixture.add_list(&pool, "Second").await;
    let theirs = other.add_list(&pool, "Theirs").await;

    let mut tx = pool.begin().await.unwrap();
    let result = reorder_all(
        &mut tx,
        Container::Board(fixture.board.id),
        &[second.id, theirs.id, mine.id],
    )
    .await;
    assert!(matches!(
        result,
        Err(PositionError::InvalidOrder(OrderError::UnknownId(id))) if id == theirs.id
    ));
    drop(tx);

    let theirs_now = List::find_by_id(&pool, theirs.id).await.unwrap().unwrap();
    assert_eq!(theirs_now, theirs);
    let mine_now = List::find_by_id(&pool, mine.id).await.unwrap().unwrap();
    assert_eq!(mine_now.position, 0);

    fixture.cleanup(&pool).await;
    other.cleanup(&pool).await;
}

#[tokio::test]
async fn test_assign_positions_skips_items_outside_container() {
    let pool = setup_pool().await;
    let fixture = Fixture::new(&pool).await;
    let list = fixture.add_list(&pool, "A").await;
    let other_list = fixture.add_list(&pool, "B").await;

    let first = fixture.add_card(&pool, list.id, "first").await;
    let second = fixture.add_card(&pool, list.id, "second").await;
    let outsider = fixture.add_card(&pool, other_list.id, "outsider").await;

    let placements = [
        Placement {
            id: first.id,
            parent_id: list.id,
            position: 1,
        },
        Placement {
            id: second.id,
            parent_id: other_list.id,
            position: 0,
        },
        Placement {
            id: outsider.id,
            parent_id: list.id,
            position: 5,
        },
    ];

    let mut tx = pool.begin().await.unwrap();
    let updated = assign_positions(&mut tx, Container::List(list.id), &placements)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated, 2);

    let second_now = Card::find_by_id(&pool, second.id).await.unwrap().unwrap();
    assert_eq!((second_now.list_id, second_now.position), (other_list.id, 0));

    let outsider_now = Card::find_by_id(&pool, outsider.id).await.unwrap().unwrap();
    assert_eq!(outsider_now, outsider);

    fixture.cleanup(&pool).await;
}
