/// Workspace model and database operations
///
/// A workspace is the unit of ownership: its `owner_id` decides who may act
/// on every board, list and card below it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     image_url VARCHAR(1024),
///     owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub owner_id: i32,
}

/// Input for creating a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
    pub image_url: Option<String>,
    pub owner_id: i32,
}

/// Input for updating a workspace
///
/// `"image_url": null` clears the image; an absent key keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWorkspace {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

impl UpdateWorkspace {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image_url.is_none()
    }

    pub fn trimmed(mut self) -> Self {
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
        self
    }
}

impl Workspace {
    pub async fn create(pool: &PgPool, data: CreateWorkspace) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name, image_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, image_url, owner_id
            "#,
        )
        .bind(data.name)
        .bind(data.image_url)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            "SELECT id, name, image_url, owner_id FROM workspaces WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Workspaces owned by a user, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, image_url, owner_id
            FROM workspaces
            WHERE owner_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Updates name and/or image; absent fields keep their value
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateWorkspace,
    ) -> Result<Option<Self>, sqlx::Error> {
        let set_image = data.image_url.is_some();

        sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspaces
            SET name = COALESCE($2, name),
                image_url = CASE WHEN $3 THEN $4 ELSE image_url END
            WHERE id = $1
            RETURNING id, name, image_url, owner_id
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(set_image)
        .bind(data.image_url.flatten())
        .fetch_optional(pool)
        .await
    }

    /// Deletes a workspace with its boards, lists and cards
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
