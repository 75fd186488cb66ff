/// Card model and database operations
///
/// Cards are ordered within their list by `position`. Moving a card between
/// lists is a single `list_id` change, so a card is never in two lists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cards (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     position INTEGER NOT NULL DEFAULT 0 CHECK (position >= 0),
///     list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use validator::Validate;

use super::double_option;

const CARD_COLUMNS: &str = "id, title, description, position, list_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub list_id: i32,
}

/// Partial update of a card
///
/// Only `title`, `description`, `position` and `list_id` are recognized.
/// `"description": null` clears the description, while an absent key
/// leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 0,
        max = 1_000_000_000,
        message = "Position must be between 0 and 1000000000"
    ))]
    pub position: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<i32>,
}

impl UpdateCard {
    /// Update moving a card to `list_id` at `position`
    pub fn placement(list_id: i32, position: i32) -> Self {
        Self {
            list_id: Some(list_id),
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.position.is_none()
            && self.list_id.is_none()
    }

    /// Whether the update touches the card's placement
    pub fn moves(&self) -> bool {
        self.position.is_some() || self.list_id.is_some()
    }

    /// Strips surrounding whitespace from the title, so a blank title
    /// fails validation instead of being stored empty
    pub fn trimmed(mut self) -> Self {
        if let Some(title) = self.title.as_mut() {
            *title = title.trim().to_string();
        }
        self
    }
}

impl Card {
    /// Inserts a card at `position`
    ///
    /// Get the position from [`crate::position::append`] in the same transaction.
    pub async fn insert<'e, E>(
        executor: E,
        list_id: i32,
        title: &str,
        description: Option<&str>,
        position: i32,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Card>(&format!(
            r#"
            INSERT INTO cards (title, description, position, list_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(position)
        .bind(list_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Card>(&format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Cards of a list in display order
    pub async fn list_by_list<'e, E>(executor: E, list_id: i32) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE list_id = $1 ORDER BY position, id",
            CARD_COLUMNS
        ))
        .bind(list_id)
        .fetch_all(executor)
        .await
    }

    /// Writes title and/or description, leaving placement alone
    ///
    /// Returns the current row when neither is given, `None` if the card
    /// doesn't exist.
    pub async fn update_details<'e, E>(
        executor: E,
        id: i32,
        title: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = String::from("UPDATE cards SET id = id");
        let mut bind_count = 1;

        if title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", CARD_COLUMNS));

        let mut q = sqlx::query_as::<_, Card>(&query).bind(id);

        if let Some(title) = title {
            q = q.bind(title);
        }
        if let Some(description) = description {
            q = q.bind(description);
        }

        q.fetch_optional(executor).await
    }

    /// Deletes a card; siblings keep their positions
    pub async fn delete<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
