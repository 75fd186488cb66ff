/// List model and database operations
///
/// Lists are ordered within their board by `position`. Position writes go
/// through [`crate::position`]; this module only reads rows, inserts them at
/// a position computed there, and edits the title.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE lists (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     position INTEGER NOT NULL DEFAULT 0 CHECK (position >= 0),
///     board_id INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    pub id: i32,
    pub title: String,
    pub position: i32,
    pub board_id: i32,
}

/// Partial update of a list
///
/// Only `title`, `position` and `board_id` are recognized; anything else in
/// a request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 0,
        max = 1_000_000_000,
        message = "Position must be between 0 and 1000000000"
    ))]
    pub position: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<i32>,
}

impl UpdateList {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.position.is_none() && self.board_id.is_none()
    }

    /// Whether the update touches the list's placement
    pub fn moves(&self) -> bool {
        self.position.is_some() || self.board_id.is_some()
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

impl List {
    /// Inserts a list at `position`
    ///
    /// Get the position from [`crate::position::append`] in the same transaction.
    pub async fn insert<'e, E>(
        executor: E,
        board_id: i32,
        title: &str,
        position: i32,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (title, position, board_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, position, board_id
            "#,
        )
        .bind(title)
        .bind(position)
        .bind(board_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, List>("SELECT id, title, position, board_id FROM lists WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lists of a board in display order
    pub async fn list_by_board<'e, E>(executor: E, board_id: i32) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, title, position, board_id
            FROM lists
            WHERE board_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(board_id)
        .fetch_all(executor)
        .await
    }

    pub async fn rename<'e, E>(executor: E, id: i32, title: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, List>(
            "UPDATE lists SET title = $2 WHERE id = $1 RETURNING id, title, position, board_id",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a list with its cards
    ///
    /// Remaining siblings keep their positions.
    pub async fn delete<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_list_recognized_fields() {
        let update: UpdateList =
            serde_json::from_str(r#"{"position": 3, "color": "red"}"#).unwrap();

        assert_eq!(update.position, Some(3));
        assert!(update.moves());
        assert!(!update.is_empty());

        let unknown_only: UpdateList = serde_json::from_str(r#"{"color": "red"}"#).unwrap();
        assert!(unknown_only.is_empty());
    }

    #[test]
    fn test_update_list_validation() {
        let update = UpdateList {
            position: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateList {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateList {
            title: Some("Done".to_string()),
            position: Some(0),
            board_id: Some(4),
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_list_blank_title_fails_after_trim() {
        let update: UpdateList = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(update.validate().is_ok());
        assert!(update.trimmed().validate().is_err());

        let update: UpdateList = serde_json::from_str(r#"{"title": "  Doing "}"#).unwrap();
        assert_eq!(update.trimmed().title.as_deref(), Some("Doing"));
    }

    #[test]
    fn test_update_list_position_upper_bound() {
        let at_bound = UpdateList {
            position: Some(crate::ordering::MAX_POSITION),
            ..Default::default()
        };
        assert!(at_bound.validate().is_ok());

        let past_bound = UpdateList {
            position: Some(i32::MAX),
            ..Default::default()
        };
        assert!(past_bound.validate().is_err());
    }

    #[test]
    fn test_update_list_serializes_only_present_fields() {
        let update = UpdateList {
            position: Some(2),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"position":2}"#);
    }
}
