/// Database models for the kanban store
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `workspace`: Top-level containers, each with a single owner
/// - `board`: Boards inside a workspace
/// - `list`: Ordered lists on a board
/// - `card`: Ordered cards in a list
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::workspace::{CreateWorkspace, Workspace};
/// use kanban_shared::models::board::Board;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let workspace = Workspace::create(&pool, CreateWorkspace {
///     name: "Personal".to_string(),
///     image_url: None,
///     owner_id: 1,
/// })
/// .await?;
///
/// let board = Board::create(&pool, workspace.id, "Roadmap").await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod board;
pub mod card;
pub mod list;
pub mod user;
pub mod workspace;

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`)
///
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
