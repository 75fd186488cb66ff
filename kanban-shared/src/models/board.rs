/// Board model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: i32,
    pub name: String,
    pub workspace_id: i32,
}

impl Board {
    pub async fn create(pool: &PgPool, workspace_id: i32, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (name, workspace_id)
            VALUES ($1, $2)
            RETURNING id, name, workspace_id
            "#,
        )
        .bind(name)
        .bind(workspace_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>("SELECT id, name, workspace_id FROM boards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            "SELECT id, name, workspace_id FROM boards WHERE workspace_id = $1 ORDER BY id",
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await
    }

    pub async fn rename(pool: &PgPool, id: i32, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            "UPDATE boards SET name = $2 WHERE id = $1 RETURNING id, name, workspace_id",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a board with its lists and cards
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
