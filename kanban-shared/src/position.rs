/// Position engine
///
/// Persists sibling order for the two ordered containers:
///
/// | Container | Table    | Children | Parent column |
/// |-----------|----------|----------|---------------|
/// | Board     | `boards` | `lists`  | `board_id`    |
/// | List      | `lists`  | `cards`  | `list_id`     |
///
/// # Operations
///
/// - [`append`]: next free position in a container (`max + 1`, empty → 0)
/// - [`move_single`]: direct assignment of one item, optionally to another container
/// - [`reorder_all`]: dense `0..n-1` re-sequence of a whole container
/// - [`assign_positions`]: bulk direct assignment
///
/// Every function takes a `&mut PgConnection` and is meant to run inside a
/// transaction opened by the caller. Operations that depend on the set of
/// siblings first lock the container row (`SELECT ... FOR UPDATE`), which
/// serializes concurrent appends and reorders of the same container until
/// the caller commits. When two containers are involved they are locked in
/// ascending id order.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::position::{append, Container};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let position = append(&mut tx, Container::List(2)).await?;
/// sqlx::query("INSERT INTO cards (title, list_id, position) VALUES ($1, $2, $3)")
///     .bind("Write tests")
///     .bind(2)
///     .bind(position)
///     .execute(&mut *tx)
///     .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::auth::authorization::EntityRef;
use crate::ordering::{dense_order, next_position, OrderError, MAX_POSITION};

/// A row whose children are ordered by `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    Board(i32),
    List(i32),
}

impl Container {
    pub fn id(&self) -> i32 {
        match *self {
            Container::Board(id) | Container::List(id) => id,
        }
    }

    /// Container of the same kind with another id
    pub fn with_id(&self, id: i32) -> Container {
        match self {
            Container::Board(_) => Container::Board(id),
            Container::List(_) => Container::List(id),
        }
    }

    pub fn entity(&self) -> EntityRef {
        match *self {
            Container::Board(id) => EntityRef::Board(id),
            Container::List(id) => EntityRef::List(id),
        }
    }

    fn table(&self) -> &'static str {
        match self {
            Container::Board(_) => "boards",
            Container::List(_) => "lists",
        }
    }

    fn children_table(&self) -> &'static str {
        match self {
            Container::Board(_) => "lists",
            Container::List(_) => "cards",
        }
    }

    fn parent_column(&self) -> &'static str {
        match self {
            Container::Board(_) => "board_id",
            Container::List(_) => "list_id",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity().fmt(f)
    }
}

/// An ordered child: a list on a board or a card in a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    List(i32),
    Card(i32),
}

impl Item {
    pub fn id(&self) -> i32 {
        match *self {
            Item::List(id) | Item::Card(id) => id,
        }
    }

    /// Container of this item's kind with the given id
    pub fn container(&self, parent_id: i32) -> Container {
        match self {
            Item::List(_) => Container::Board(parent_id),
            Item::Card(_) => Container::List(parent_id),
        }
    }

    fn table(&self) -> &'static str {
        self.container(0).children_table()
    }

    fn parent_column(&self) -> &'static str {
        self.container(0).parent_column()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::List(id) => write!(f, "list {}", id),
            Item::Card(id) => write!(f, "card {}", id),
        }
    }
}

/// Where an item sits: its container and its position there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Placement {
    pub id: i32,
    pub parent_id: i32,
    pub position: i32,
}

/// Error type for position operations
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    /// Positions must be zero or greater
    #[error("Position must be non-negative, got {0}")]
    NegativePosition(i32),

    /// Directly assigned positions stay at or below [`MAX_POSITION`]
    #[error("Position must be at most {max}, got {0}", max = MAX_POSITION)]
    PositionTooLarge(i32),

    /// Appending would overflow the container's last position
    #[error("{0} has no position left; reorder it to compact positions")]
    ContainerFull(Container),

    /// Container row does not exist
    #[error("{0} not found")]
    ContainerNotFound(Container),

    /// Item row does not exist
    #[error("{0} not found")]
    ItemNotFound(Item),

    /// Requested order does not match the container's children
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Rejects positions outside `0..=MAX_POSITION`
pub fn check_position(position: i32) -> Result<i32, PositionError> {
    if position < 0 {
        return Err(PositionError::NegativePosition(position));
    }
    if position > MAX_POSITION {
        return Err(PositionError::PositionTooLarge(position));
    }
    Ok(position)
}

/// Locks a container row until the surrounding transaction ends
pub async fn lock_container(
    conn: &mut PgConnection,
    container: Container,
) -> Result<(), PositionError> {
    let sql = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", container.table());

    sqlx::query_scalar::<_, i32>(&sql)
        .bind(container.id())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(PositionError::ContainerNotFound(container))?;

    Ok(())
}

/// Locks several containers in ascending order, each at most once
pub async fn lock_containers(
    conn: &mut PgConnection,
    containers: &[Container],
) -> Result<(), PositionError> {
    let mut ordered = containers.to_vec();
    ordered.sort();
    ordered.dedup();

    for container in ordered {
        lock_container(conn, container).await?;
    }

    Ok(())
}

/// Locks `container` and returns the position for a new last child
///
/// Insert the child in the same transaction; the lock keeps a concurrent
/// append from computing the same position before this one commits.
pub async fn append(conn: &mut PgConnection, container: Container) -> Result<i32, PositionError> {
    lock_container(conn, container).await?;

    let sql = format!(
        "SELECT MAX(position) FROM {} WHERE {} = $1",
        container.children_table(),
        container.parent_column()
    );

    let last = sqlx::query_scalar::<_, Option<i32>>(&sql)
        .bind(container.id())
        .fetch_one(&mut *conn)
        .await?;

    next_position(last).map_err(|_| PositionError::ContainerFull(container))
}

/// Reads an item's current placement
pub async fn placement_of(conn: &mut PgConnection, item: Item) -> Result<Placement, PositionError> {
    let sql = format!(
        "SELECT id, {} AS parent_id, position FROM {} WHERE id = $1",
        item.parent_column(),
        item.table()
    );

    sqlx::query_as::<_, Placement>(&sql)
        .bind(item.id())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(PositionError::ItemNotFound(item))
}

/// Moves one item by direct assignment
///
/// `to_parent` changes the item's container, `position` its position; either
/// may be omitted. Siblings are never renumbered, so the source container
/// keeps a gap and the destination may briefly hold a tie. A container
/// change locks both containers first.
pub async fn move_single(
    conn: &mut PgConnection,
    item: Item,
    to_parent: Option<i32>,
    position: Option<i32>,
) -> Result<Placement, PositionError> {
    if let Some(position) = position {
        check_position(position)?;
    }

    let current = placement_of(conn, item).await?;

    if to_parent.is_none() && position.is_none() {
        return Ok(current);
    }

    if let Some(parent_id) = to_parent.filter(|&p| p != current.parent_id) {
        lock_containers(
            conn,
            &[item.container(current.parent_id), item.container(parent_id)],
        )
        .await?;
    }

    let sql = format!(
        r#"
        UPDATE {table}
        SET {parent} = COALESCE($2, {parent}), position = COALESCE($3, position)
        WHERE id = $1
        RETURNING id, {parent} AS parent_id, position
        "#,
        table = item.table(),
        parent = item.parent_column()
    );

    let placement = sqlx::query_as::<_, Placement>(&sql)
        .bind(item.id())
        .bind(to_parent)
        .bind(position)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(PositionError::ItemNotFound(item))?;

    tracing::debug!(
        item = %item,
        from = current.parent_id,
        to = placement.parent_id,
        position = placement.position,
        "Moved item"
    );

    Ok(placement)
}

/// Re-sequences every child of `container` to `0..n-1`
///
/// `ordered_ids` come first in the given order; children it omits follow in
/// their previous relative order. Unknown or repeated ids reject the whole
/// request before anything is written. Returns the applied `(id, position)`
/// pairs.
pub async fn reorder_all(
    conn: &mut PgConnection,
    container: Container,
    ordered_ids: &[i32],
) -> Result<Vec<(i32, i32)>, PositionError> {
    lock_container(conn, container).await?;

    let select = format!(
        "SELECT id FROM {} WHERE {} = $1 ORDER BY position, id",
        container.children_table(),
        container.parent_column()
    );

    let current = sqlx::query_scalar::<_, i32>(&select)
        .bind(container.id())
        .fetch_all(&mut *conn)
        .await?;

    let order = dense_order(&current, ordered_ids)?;
    let (ids, positions): (Vec<i32>, Vec<i32>) = order.iter().copied().unzip();

    let update = format!(
        r#"
        UPDATE {table} AS c
        SET position = v.position
        FROM UNNEST($1::int4[], $2::int4[]) AS v(id, position)
        WHERE c.id = v.id AND c.{parent} = $3
        "#,
        table = container.children_table(),
        parent = container.parent_column()
    );

    sqlx::query(&update)
        .bind(&ids)
        .bind(&positions)
        .bind(container.id())
        .execute(&mut *conn)
        .await?;

    tracing::debug!(container = %container, count = order.len(), "Reordered container");

    Ok(order)
}

/// Applies explicit placements to children of `container`
///
/// Each placement sets both position and parent, so a placement may move a
/// child into another container of the same kind. Placements naming an
/// item that is not currently in `container` are skipped. All involved
/// containers are locked first. Returns the number of items updated.
pub async fn assign_positions(
    conn: &mut PgConnection,
    container: Container,
    placements: &[Placement],
) -> Result<u64, PositionError> {
    for placement in placements {
        check_position(placement.position)?;
    }

    let mut involved: Vec<Container> = placements
        .iter()
        .map(|p| container.with_id(p.parent_id))
        .collect();
    involved.push(container);
    lock_containers(conn, &involved).await?;

    let sql = format!(
        "UPDATE {table} SET position = $2, {parent} = $3 WHERE id = $1 AND {parent} = $4",
        table = container.children_table(),
        parent = container.parent_column()
    );

    let mut updated = 0;
    for placement in placements {
        updated += sqlx::query(&sql)
            .bind(placement.id)
            .bind(placement.position)
            .bind(placement.parent_id)
            .bind(container.id())
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }

    if updated < placements.len() as u64 {
        tracing::debug!(
            container = %container,
            requested = placements.len(),
            updated,
            "Skipped placements for items outside the container"
        );
    }

    Ok(updated)
}
