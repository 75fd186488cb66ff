/// Ownership resolution and authorization checks
///
/// Every workspace has exactly one owner, and ownership flows down the
/// foreign-key chain:
///
/// ```text
/// card ─list_id─▶ list ─board_id─▶ board ─workspace_id─▶ workspace.owner_id
/// ```
///
/// A caller may act on an entity only if they own the workspace that
/// transitively contains it. The owner is re-derived on every call with a
/// single parameterized join; there is no cached or denormalized owner column.
///
/// # Policy
///
/// - malformed id → [`AuthzError::InvalidReference`] (400), before any query
/// - entity or any link missing → [`AuthzError::NotFound`] (404)
/// - entity exists but belongs to someone else → [`AuthzError::Forbidden`] (403)
///
/// The same policy applies to every endpoint.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::auth::authorization::{parse_entity_id, require_owner, EntityRef};
/// use kanban_shared::auth::middleware::AuthContext;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, auth: AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// let card_id = parse_entity_id("5")?;
/// require_owner(&pool, &auth, EntityRef::Card(card_id)).await?;
/// # Ok(())
/// # }
/// ```

use std::fmt;

use sqlx::PgExecutor;

use super::middleware::AuthContext;

/// Reference to an entity whose owner can be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Workspace(i32),
    Board(i32),
    List(i32),
    Card(i32),
}

impl EntityRef {
    /// Lowercase entity name used in messages
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Workspace(_) => "workspace",
            EntityRef::Board(_) => "board",
            EntityRef::List(_) => "list",
            EntityRef::Card(_) => "card",
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            EntityRef::Workspace(id)
            | EntityRef::Board(id)
            | EntityRef::List(id)
            | EntityRef::Card(id) => id,
        }
    }

    /// Query returning the owning user id, or no row when the chain breaks
    fn owner_query(&self) -> &'static str {
        match self {
            EntityRef::Workspace(_) => "SELECT owner_id FROM workspaces WHERE id = $1",
            EntityRef::Board(_) => {
                r#"
                SELECT w.owner_id
                FROM boards b
                JOIN workspaces w ON b.workspace_id = w.id
                WHERE b.id = $1
                "#
            }
            EntityRef::List(_) => {
                r#"
                SELECT w.owner_id
                FROM lists l
                JOIN boards b ON l.board_id = b.id
                JOIN workspaces w ON b.workspace_id = w.id
                WHERE l.id = $1
                "#
            }
            EntityRef::Card(_) => {
                r#"
                SELECT w.owner_id
                FROM cards c
                JOIN lists l ON c.list_id = l.id
                JOIN boards b ON l.board_id = b.id
                JOIN workspaces w ON b.workspace_id = w.id
                WHERE c.id = $1
                "#
            }
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Id is missing, non-numeric or not positive
    #[error("Invalid reference: {0:?}")]
    InvalidReference(String),

    /// Entity or a link of its ownership chain does not exist
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// Entity exists but the caller does not own it
    #[error("Not authorized to access {0}")]
    Forbidden(EntityRef),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Parses a path segment into an entity id
///
/// Only positive integers are valid; this runs before any store access.
pub fn parse_entity_id(raw: &str) -> Result<i32, AuthzError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AuthzError::InvalidReference(raw.to_string())),
    }
}

/// Resolves the user owning `entity` in one round trip
pub async fn resolve_owner<'e, E>(executor: E, entity: EntityRef) -> Result<i32, AuthzError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i32>(entity.owner_query())
        .bind(entity.id())
        .fetch_optional(executor)
        .await?
        .ok_or(AuthzError::NotFound(entity))
}

/// Compares a resolved owner with the caller
pub fn check_owner(auth: &AuthContext, entity: EntityRef, owner_id: i32) -> Result<(), AuthzError> {
    if auth.user_id != owner_id {
        return Err(AuthzError::Forbidden(entity));
    }

    Ok(())
}

/// Resolves the owner of `entity` and requires it to be the caller
pub async fn require_owner<'e, E>(
    executor: E,
    auth: &AuthContext,
    entity: EntityRef,
) -> Result<(), AuthzError>
where
    E: PgExecutor<'e>,
{
    let owner_id = resolve_owner(executor, entity).await?;
    check_owner(auth, entity, owner_id)
}
